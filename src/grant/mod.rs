//! Grant flows and the token lifecycle state machine.
//!
//! Each OAuth2 grant is a [`Flow`] that knows how to acquire its initial
//! token. [`Grant`] wraps a flow with the shared lifecycle logic: the owned
//! token slot, the expiry/refresh decision in [`Grant::ensure_valid_token`],
//! and the single-flight guarantee that at most one token-acquisition or
//! refresh exchange is in flight per grant.

pub mod authorization_code;
pub mod client_credentials;
pub mod device_code;
pub mod password;
pub mod refresh_token;

pub use authorization_code::{AuthorizationCode, AuthorizationCodeGrant};
pub use client_credentials::{ClientCredentials, ClientCredentialsGrant};
pub use device_code::{
    DeviceCode, DeviceCodeGrant, TracingNotifier, VerificationNotifier,
};
pub use password::{ResourceOwnerPassword, ResourceOwnerPasswordGrant};
pub use refresh_token::{RefreshToken, RefreshTokenGrant};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{OAuth2Error, Result};
use crate::token::Token;
use crate::types::{ErrorResponse, RefreshTokenRequest, TokenResponse, GRANT_TYPE_REFRESH_TOKEN};

/// Anything that can produce a valid bearer token on demand.
///
/// Object-safe facade over [`Grant`]; the client interceptor depends only
/// on this.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a token that is valid right now, fetching or refreshing if
    /// the stored one is missing or stale.
    async fn ensure_valid_token(&self) -> Result<Token>;
}

/// The token endpoint shared by all grant flows.
///
/// Posts form-encoded grant requests and classifies responses: a parsable
/// token body becomes a [`Token`], a parsable OAuth2 error body becomes
/// [`OAuth2Error::Protocol`] regardless of HTTP status (some servers return
/// error codes with 200), and anything else is a transport-level failure.
#[derive(Debug, Clone)]
pub struct TokenEndpoint {
    http: reqwest::Client,
    url: String,
}

impl TokenEndpoint {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Execute a token request and parse the result.
    pub async fn execute<B>(&self, request: &B) -> Result<Token>
    where
        B: Serialize + ?Sized,
    {
        let response = self.http.post(&self.url).form(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if let Ok(error) = serde_json::from_str::<ErrorResponse>(&body) {
            return Err(OAuth2Error::Protocol(error));
        }
        if !status.is_success() {
            return Err(OAuth2Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        let token_response: TokenResponse = serde_json::from_str(&body)
            .map_err(|err| OAuth2Error::InvalidResponse(format!("malformed token response: {err}")))?;
        Ok(Token::from_response(token_response, Utc::now()))
    }
}

/// Flow-specific token acquisition logic.
#[async_trait]
pub trait Flow: Send + Sync {
    /// Grant name for logging.
    fn name(&self) -> &'static str;

    /// Perform the flow's initial token acquisition exchange.
    async fn fetch_token(&self, endpoint: &TokenEndpoint) -> Result<Token>;
}

/// A grant: a flow plus the owned token and its lifecycle.
///
/// The token slot is a `tokio::sync::Mutex` held across the network
/// exchange, so concurrent callers of [`Grant::ensure_valid_token`]
/// serialize: one performs the exchange, the rest observe the freshly
/// stored token. The slot is only ever replaced whole.
pub struct Grant<F: Flow> {
    endpoint: TokenEndpoint,
    flow: F,
    token: Mutex<Option<Token>>,
}

impl<F: Flow> Grant<F> {
    /// Create a grant for `flow` against `token_url` with a fresh HTTP
    /// client.
    pub fn from_flow(token_url: impl Into<String>, flow: F) -> Self {
        Self {
            endpoint: TokenEndpoint::new(reqwest::Client::new(), token_url),
            flow,
            token: Mutex::new(None),
        }
    }

    /// Use a shared HTTP client instead of a dedicated one.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.endpoint = TokenEndpoint::new(http, self.endpoint.url.clone());
        self
    }

    /// Seed the grant with a previously obtained token.
    pub fn with_token(self, token: Token) -> Self {
        Self {
            token: Mutex::new(Some(token)),
            ..self
        }
    }

    /// Snapshot of the currently stored token, if any.
    pub async fn token(&self) -> Option<Token> {
        self.token.lock().await.clone()
    }

    pub fn token_url(&self) -> &str {
        self.endpoint.url()
    }

    pub(crate) fn flow(&self) -> &F {
        &self.flow
    }

    pub(crate) fn flow_mut(&mut self) -> &mut F {
        &mut self.flow
    }

    /// Perform the flow's initial token acquisition and store the result.
    pub async fn fetch_token(&self) -> Result<Token> {
        let mut slot = self.token.lock().await;
        self.fetch_locked(&mut slot).await
    }

    /// Refresh the stored token using its refresh token.
    ///
    /// Fails with [`OAuth2Error::Authentication`] when no refresh token is
    /// available. When the server does not rotate the refresh token, the
    /// previous one is carried over into the new token.
    pub async fn refresh_token(&self) -> Result<Token> {
        let mut slot = self.token.lock().await;
        self.refresh_locked(&mut slot).await
    }

    /// The composite decision used before every outgoing request: return
    /// the stored token if still valid, refresh it if possible, otherwise
    /// re-run the full flow.
    pub async fn ensure_valid_token(&self) -> Result<Token> {
        let mut slot = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = slot.as_ref() {
            if token.is_valid(now) {
                return Ok(token.clone());
            }
        }
        if slot.as_ref().is_some_and(|token| token.is_refreshable(now)) {
            debug!(grant = self.flow.name(), "stored token expired, refreshing");
            self.refresh_locked(&mut slot).await
        } else {
            debug!(
                grant = self.flow.name(),
                "no usable token stored, fetching a new one"
            );
            self.fetch_locked(&mut slot).await
        }
    }

    async fn fetch_locked(&self, slot: &mut Option<Token>) -> Result<Token> {
        let token = self.flow.fetch_token(&self.endpoint).await?;
        info!(grant = self.flow.name(), "token acquired");
        *slot = Some(token.clone());
        Ok(token)
    }

    async fn refresh_locked(&self, slot: &mut Option<Token>) -> Result<Token> {
        let refresh = slot
            .as_ref()
            .and_then(|token| token.refresh_token.clone())
            .ok_or_else(|| {
                OAuth2Error::Authentication("no refresh token available".to_string())
            })?;
        let request = RefreshTokenRequest {
            grant_type: GRANT_TYPE_REFRESH_TOKEN,
            refresh_token: &refresh,
            scope: None,
        };
        let mut token = self.endpoint.execute(&request).await.map_err(|err| {
            if let OAuth2Error::Protocol(response) = &err {
                return OAuth2Error::Authentication(format!("refresh rejected: {response}"));
            }
            err
        })?;
        // Servers are not required to rotate refresh tokens.
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh);
        }
        info!(grant = self.flow.name(), "token refreshed");
        *slot = Some(token.clone());
        Ok(token)
    }
}

#[async_trait]
impl<F: Flow> TokenSource for Grant<F> {
    async fn ensure_valid_token(&self) -> Result<Token> {
        Grant::ensure_valid_token(self).await
    }
}
