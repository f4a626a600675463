//! Wire request and response models for the token and device endpoints.
//!
//! Request bodies are form-encoded (`RequestBuilder::form`); optional fields
//! are skipped entirely so bodies carry no extraneous parameters. Responses
//! are JSON.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const GRANT_TYPE_PASSWORD: &str = "password";
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";
pub const GRANT_TYPE_DEVICE_CODE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Access token request for the Authorization Code grant (RFC 6749 §4.1.3).
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationCodeTokenRequest<'a> {
    pub grant_type: &'static str,
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<&'a str>,
    pub client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<&'a str>,
}

/// Access token request for the Client Credentials grant (RFC 6749 §4.4.2).
#[derive(Debug, Clone, Serialize)]
pub struct ClientCredentialsTokenRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<&'a str>,
}

/// Access token request for the Resource Owner Password Credentials grant
/// (RFC 6749 §4.3.2).
#[derive(Debug, Clone, Serialize)]
pub struct PasswordTokenRequest<'a> {
    pub grant_type: &'static str,
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<&'a str>,
}

/// Access token request using a refresh token (RFC 6749 §6).
#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenRequest<'a> {
    pub grant_type: &'static str,
    pub refresh_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<&'a str>,
}

/// Device authorization request (RFC 8628 §3.1).
#[derive(Debug, Clone, Serialize)]
pub struct DeviceAuthorizationRequest<'a> {
    pub client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge_method: Option<&'a str>,
}

/// Device access token request (RFC 8628 §3.4).
#[derive(Debug, Clone, Serialize)]
pub struct DeviceAccessTokenRequest<'a> {
    pub grant_type: &'static str,
    pub device_code: &'a str,
    pub client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<&'a str>,
}

/// Successful token endpoint response (RFC 6749 §5.1).
///
/// Fields the runtime does not interpret are preserved in `extra`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub refresh_expires_in: Option<u64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Device authorization response (RFC 8628 §3.2).
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceAuthorizationResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default)]
    pub verification_uri_complete: Option<String>,
    /// Lifetime in seconds of the device code and user code.
    pub expires_in: u64,
    /// Minimum wait between polling requests, in seconds.
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_interval() -> u64 {
    5
}

impl DeviceAuthorizationResponse {
    /// The instruction shown to the human operator before polling starts.
    pub fn verification_message(&self) -> String {
        match &self.verification_uri_complete {
            Some(uri) => format!("Visit {uri} to authenticate"),
            None => format!(
                "Visit {} and enter code {} to authenticate",
                self.verification_uri, self.user_code
            ),
        }
    }
}

/// OAuth2 error response (RFC 6749 §5.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(description) = &self.error_description {
            write!(f, ": {description}")?;
        }
        Ok(())
    }
}
