//! Authorization Code grant (RFC 6749 §4.1) with optional PKCE (RFC 7636).

use async_trait::async_trait;

use super::{Flow, Grant, TokenEndpoint};
use crate::error::{OAuth2Error, Result};
use crate::pkce::Pkce;
use crate::token::Token;
use crate::types::{AuthorizationCodeTokenRequest, GRANT_TYPE_AUTHORIZATION_CODE};

/// Flow state for the Authorization Code grant.
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    code: String,
    client_id: String,
    redirect_uri: Option<String>,
    pkce: Option<Pkce>,
}

/// Grant exchanging an authorization code obtained via the user agent.
///
/// When PKCE is enabled, [`AuthorizationCodeGrant::authorization_request_url`]
/// carries the code challenge and the token exchange sends the matching
/// verifier; a `Pkce` pair must not be reused across attempts.
pub type AuthorizationCodeGrant = Grant<AuthorizationCode>;

impl AuthorizationCodeGrant {
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Grant::from_flow(
            token_url,
            AuthorizationCode {
                code: code.into(),
                client_id: client_id.into(),
                redirect_uri: None,
                pkce: None,
            },
        )
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.flow_mut().redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_pkce(mut self, pkce: Pkce) -> Self {
        self.flow_mut().pkce = Some(pkce);
        self
    }

    /// Build the authorization request URL the user agent should visit
    /// (RFC 6749 §4.1.1), including the PKCE challenge when enabled.
    pub fn authorization_request_url(
        &self,
        authorization_endpoint: &str,
        scope: Option<&str>,
        state: Option<&str>,
    ) -> Result<String> {
        let flow = self.flow();
        let mut params: Vec<(&str, &str)> = vec![
            ("response_type", "code"),
            ("client_id", &flow.client_id),
        ];
        if let Some(redirect_uri) = &flow.redirect_uri {
            params.push(("redirect_uri", redirect_uri));
        }
        if let Some(scope) = scope {
            params.push(("scope", scope));
        }
        if let Some(state) = state {
            params.push(("state", state));
        }
        if let Some(pkce) = &flow.pkce {
            params.push(("code_challenge", &pkce.code_challenge));
            params.push(("code_challenge_method", pkce.code_challenge_method.as_str()));
        }
        let url = reqwest::Url::parse_with_params(authorization_endpoint, &params)
            .map_err(|err| {
                OAuth2Error::Configuration(format!("invalid authorization endpoint: {err}"))
            })?;
        Ok(url.to_string())
    }
}

#[async_trait]
impl Flow for AuthorizationCode {
    fn name(&self) -> &'static str {
        "authorization_code"
    }

    async fn fetch_token(&self, endpoint: &TokenEndpoint) -> Result<Token> {
        let request = AuthorizationCodeTokenRequest {
            grant_type: GRANT_TYPE_AUTHORIZATION_CODE,
            code: &self.code,
            redirect_uri: self.redirect_uri.as_deref(),
            client_id: &self.client_id,
            code_verifier: self.pkce.as_ref().map(|pkce| pkce.code_verifier.as_str()),
        };
        endpoint.execute(&request).await
    }
}
