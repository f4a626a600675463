//! OAuth token value object and expiry queries.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TokenResponse;

/// An access token plus optional refresh token and expiry metadata.
///
/// Created by a grant from a successful token response and replaced as a
/// whole object on every refresh; never mutated field-by-field. `extra`
/// preserves server-returned fields the runtime does not interpret.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use oauth2_client::Token;
///
/// let token = Token::new("access".to_string());
/// assert!(token.is_valid(Utc::now()));
/// assert!(!token.is_refreshable(Utc::now()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub refresh_expires_at: Option<DateTime<Utc>>,
    /// Extra server-returned fields, preserved opaquely.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Token {
    /// A bearer token with no expiry and no refresh token.
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            refresh_token: None,
            expires_at: None,
            refresh_expires_at: None,
            extra: HashMap::new(),
        }
    }

    /// Build a token from a token endpoint response received at `now`.
    ///
    /// Relative lifetimes (`expires_in`, `refresh_expires_in`) become
    /// absolute timestamps; absence of `expires_in` means the token never
    /// expires until invalidated externally.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response.refresh_token,
            expires_at: response
                .expires_in
                .map(|secs| now + Duration::seconds(secs as i64)),
            refresh_expires_at: response
                .refresh_expires_in
                .map(|secs| now + Duration::seconds(secs as i64)),
            extra: response.extra,
        }
    }

    /// Whether the access token is still usable at `now`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now < expires_at,
            None => true,
        }
    }

    /// Whether a refresh can be attempted at `now`.
    pub fn is_refreshable(&self, now: DateTime<Utc>) -> bool {
        if self.refresh_token.is_none() {
            return false;
        }
        match self.refresh_expires_at {
            Some(refresh_expires_at) => now < refresh_expires_at,
            None => true,
        }
    }

    /// The `Authorization` header value for this token.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
