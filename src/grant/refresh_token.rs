//! Refresh Token grant (RFC 6749 §6) as a standalone flow.
//!
//! Useful when a long-lived refresh token was obtained out of band: the
//! initial "fetch" is itself a refresh exchange with the configured token.

use async_trait::async_trait;

use super::{Flow, Grant, TokenEndpoint};
use crate::error::Result;
use crate::token::Token;
use crate::types::{RefreshTokenRequest, GRANT_TYPE_REFRESH_TOKEN};

/// Flow state for the Refresh Token grant.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    refresh_token: String,
    scope: Option<String>,
}

/// Grant bootstrapped from an externally supplied refresh token.
pub type RefreshTokenGrant = Grant<RefreshToken>;

impl RefreshTokenGrant {
    pub fn new(token_url: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Grant::from_flow(
            token_url,
            RefreshToken {
                refresh_token: refresh_token.into(),
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
impl Flow for RefreshToken {
    fn name(&self) -> &'static str {
        "refresh_token"
    }

    async fn fetch_token(&self, endpoint: &TokenEndpoint) -> Result<Token> {
        let request = RefreshTokenRequest {
            grant_type: GRANT_TYPE_REFRESH_TOKEN,
            refresh_token: &self.refresh_token,
            scope: self.scope.as_deref(),
        };
        let mut token = endpoint.execute(&request).await?;
        if token.refresh_token.is_none() {
            token.refresh_token = Some(self.refresh_token.clone());
        }
        Ok(token)
    }
}
