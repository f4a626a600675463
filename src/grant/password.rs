//! Resource Owner Password Credentials grant (RFC 6749 §4.3).

use async_trait::async_trait;

use super::{Flow, Grant, TokenEndpoint};
use crate::error::Result;
use crate::token::Token;
use crate::types::{PasswordTokenRequest, GRANT_TYPE_PASSWORD};

/// Flow state for the Resource Owner Password Credentials grant.
#[derive(Debug, Clone)]
pub struct ResourceOwnerPassword {
    username: String,
    password: String,
    client_id: Option<String>,
    scope: Option<String>,
}

/// Grant exchanging the resource owner's username and password directly.
pub type ResourceOwnerPasswordGrant = Grant<ResourceOwnerPassword>;

impl ResourceOwnerPasswordGrant {
    pub fn new(
        token_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Grant::from_flow(
            token_url,
            ResourceOwnerPassword {
                username: username.into(),
                password: password.into(),
                client_id: None,
                scope: None,
            },
        )
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.flow_mut().client_id = Some(client_id.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.flow_mut().scope = Some(scope.into());
        self
    }
}

#[async_trait]
impl Flow for ResourceOwnerPassword {
    fn name(&self) -> &'static str {
        "password"
    }

    async fn fetch_token(&self, endpoint: &TokenEndpoint) -> Result<Token> {
        let request = PasswordTokenRequest {
            grant_type: GRANT_TYPE_PASSWORD,
            username: &self.username,
            password: &self.password,
            client_id: self.client_id.as_deref(),
            scope: self.scope.as_deref(),
        };
        endpoint.execute(&request).await
    }
}
