#![allow(dead_code)]

use chrono::{Duration, Utc};
use oauth2_client::Token;
use serde_json::json;

/// JSON token body as returned by a token endpoint.
pub fn token_body(access_token: &str, refresh_token: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 300
    });
    if let Some(refresh_token) = refresh_token {
        body["refresh_token"] = json!(refresh_token);
        body["refresh_expires_in"] = json!(1800);
    }
    body
}

/// JSON OAuth2 error body (RFC 6749 §5.2).
pub fn error_body(error: &str) -> serde_json::Value {
    json!({ "error": error })
}

/// A token that expired a minute ago but still carries a refresh token.
pub fn expired_token_with_refresh(access_token: &str, refresh_token: &str) -> Token {
    Token {
        refresh_token: Some(refresh_token.to_string()),
        expires_at: Some(Utc::now() - Duration::minutes(1)),
        refresh_expires_at: Some(Utc::now() + Duration::minutes(30)),
        ..Token::new(access_token.to_string())
    }
}

/// A token that expired a minute ago with no way to refresh it.
pub fn expired_token(access_token: &str) -> Token {
    Token {
        expires_at: Some(Utc::now() - Duration::minutes(1)),
        ..Token::new(access_token.to_string())
    }
}
