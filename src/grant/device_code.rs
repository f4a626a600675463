//! Device Code grant (RFC 8628) with optional PKCE.
//!
//! Token acquisition is a polling state machine: request a device
//! authorization, surface the verification instructions, then poll the token
//! endpoint until the user approves, the server rejects, or the device code
//! expires. `authorization_pending` and `slow_down` are absorbed into the
//! loop; every other error is terminal.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use super::{Flow, Grant, TokenEndpoint};
use crate::error::{OAuth2Error, Result};
use crate::pkce::Pkce;
use crate::token::Token;
use crate::types::{
    DeviceAccessTokenRequest, DeviceAuthorizationRequest, DeviceAuthorizationResponse,
    ErrorResponse, GRANT_TYPE_DEVICE_CODE,
};

/// Extra wait added to the poll interval on every `slow_down` response.
/// Cumulative for the rest of the polling session (RFC 8628 §3.5).
const SLOW_DOWN_INCREMENT: Duration = Duration::from_secs(5);

/// Receives the verification instructions when polling is about to start.
///
/// The runtime only produces the message content; how it reaches the human
/// operator (terminal, UI, log) is the implementor's concern.
pub trait VerificationNotifier: Send + Sync {
    fn notify(&self, authorization: &DeviceAuthorizationResponse);
}

/// Default notifier: logs the verification message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl VerificationNotifier for TracingNotifier {
    fn notify(&self, authorization: &DeviceAuthorizationResponse) {
        info!(
            user_code = %authorization.user_code,
            "{}",
            authorization.verification_message()
        );
    }
}

/// Flow state for the Device Code grant.
#[derive(Clone)]
pub struct DeviceCode {
    authorization_url: String,
    client_id: String,
    scope: Option<String>,
    pkce: Option<Pkce>,
    notifier: Arc<dyn VerificationNotifier>,
}

/// Grant for input-constrained devices: the user authorizes on a second
/// device while this one polls for the result.
///
/// Dropping the future returned by a fetch cancels polling; no partial
/// token is ever stored.
pub type DeviceCodeGrant = Grant<DeviceCode>;

impl DeviceCodeGrant {
    pub fn new(
        token_url: impl Into<String>,
        authorization_url: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Grant::from_flow(
            token_url,
            DeviceCode {
                authorization_url: authorization_url.into(),
                client_id: client_id.into(),
                scope: None,
                pkce: None,
                notifier: Arc::new(TracingNotifier),
            },
        )
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.flow_mut().scope = Some(scope.into());
        self
    }

    pub fn with_pkce(mut self, pkce: Pkce) -> Self {
        self.flow_mut().pkce = Some(pkce);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn VerificationNotifier>) -> Self {
        self.flow_mut().notifier = notifier;
        self
    }
}

impl DeviceCode {
    /// POST the device authorization request (RFC 8628 §3.1).
    async fn request_authorization(
        &self,
        endpoint: &TokenEndpoint,
    ) -> Result<DeviceAuthorizationResponse> {
        let url = format!("{}/device", self.authorization_url.trim_end_matches('/'));
        let request = DeviceAuthorizationRequest {
            client_id: &self.client_id,
            scope: self.scope.as_deref(),
            code_challenge: self.pkce.as_ref().map(|pkce| pkce.code_challenge.as_str()),
            code_challenge_method: self
                .pkce
                .as_ref()
                .map(|pkce| pkce.code_challenge_method.as_str()),
        };
        let response = endpoint.http().post(url).form(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ErrorResponse>(&body) {
                return Err(OAuth2Error::Protocol(error));
            }
            return Err(OAuth2Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|err| {
            OAuth2Error::InvalidResponse(format!("malformed device authorization response: {err}"))
        })
    }
}

#[async_trait]
impl Flow for DeviceCode {
    fn name(&self) -> &'static str {
        "device_code"
    }

    async fn fetch_token(&self, endpoint: &TokenEndpoint) -> Result<Token> {
        let authorization = self.request_authorization(endpoint).await?;
        self.notifier.notify(&authorization);

        let deadline = Utc::now() + chrono::Duration::seconds(authorization.expires_in as i64);
        // Session-local: slow_down increments accumulate here and are never
        // reset until the session ends.
        let mut interval = Duration::from_secs(authorization.interval);
        let request = DeviceAccessTokenRequest {
            grant_type: GRANT_TYPE_DEVICE_CODE,
            device_code: &authorization.device_code,
            client_id: &self.client_id,
            code_verifier: self.pkce.as_ref().map(|pkce| pkce.code_verifier.as_str()),
        };

        loop {
            tokio::time::sleep(interval).await;
            // Re-checked after every wake: a slow_down-inflated wait may
            // overshoot the deadline, in which case no further poll is made.
            if Utc::now() > deadline {
                return Err(OAuth2Error::Authentication(
                    "the device code has expired".to_string(),
                ));
            }
            match endpoint.execute(&request).await {
                Ok(token) => return Ok(token),
                Err(OAuth2Error::Protocol(error)) if error.error == "authorization_pending" => {
                    debug!(interval_secs = interval.as_secs(), "authorization pending");
                }
                Err(OAuth2Error::Protocol(error)) if error.error == "slow_down" => {
                    interval += SLOW_DOWN_INCREMENT;
                    debug!(
                        interval_secs = interval.as_secs(),
                        "server asked to slow down"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
}
