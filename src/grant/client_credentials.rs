//! Client Credentials grant (RFC 6749 §4.4).

use async_trait::async_trait;

use super::{Flow, Grant, TokenEndpoint};
use crate::error::Result;
use crate::token::Token;
use crate::types::{ClientCredentialsTokenRequest, GRANT_TYPE_CLIENT_CREDENTIALS};

/// Flow state for the Client Credentials grant.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
    scope: Option<String>,
}

/// Grant acting as its own resource owner, authenticated by client secret.
///
/// # Example
/// ```no_run
/// use oauth2_client::grant::ClientCredentialsGrant;
///
/// # async fn example() -> oauth2_client::Result<()> {
/// let grant = ClientCredentialsGrant::new(
///     "https://auth.example.com/token",
///     "service-account",
///     "s3cret",
/// )
/// .with_scope("profile email");
/// let token = grant.fetch_token().await?;
/// # Ok(())
/// # }
/// ```
pub type ClientCredentialsGrant = Grant<ClientCredentials>;

impl ClientCredentialsGrant {
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Grant::from_flow(
            token_url,
            ClientCredentials {
                client_id: client_id.into(),
                client_secret: client_secret.into(),
                scope: None,
            },
        )
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.flow_mut().scope = Some(scope.into());
        self
    }
}

#[async_trait]
impl Flow for ClientCredentials {
    fn name(&self) -> &'static str {
        "client_credentials"
    }

    async fn fetch_token(&self, endpoint: &TokenEndpoint) -> Result<Token> {
        let request = ClientCredentialsTokenRequest {
            grant_type: GRANT_TYPE_CLIENT_CREDENTIALS,
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            scope: self.scope.as_deref(),
        };
        endpoint.execute(&request).await
    }
}
