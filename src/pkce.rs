//! PKCE (Proof Key for Code Exchange) per RFC 7636.
//!
//! Generates the code verifier and challenge used during authorization. The
//! challenge goes into the authorization (or device authorization) request;
//! the matching verifier is sent in the paired token request. One `Pkce`
//! instance covers exactly one authorization attempt.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Challenge derivation method (RFC 7636 §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChallengeMethod {
    /// `challenge = BASE64URL(SHA256(verifier))`
    S256,
    /// `challenge = verifier`
    Plain,
}

impl CodeChallengeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S256 => "S256",
            Self::Plain => "plain",
        }
    }
}

/// A code verifier / code challenge pair.
///
/// # Example
/// ```
/// use oauth2_client::Pkce;
///
/// let pkce = Pkce::new();
/// assert_eq!(pkce.code_challenge_method.as_str(), "S256");
/// assert_ne!(pkce.code_verifier, pkce.code_challenge);
/// ```
#[derive(Debug, Clone)]
pub struct Pkce {
    pub code_verifier: String,
    pub code_challenge: String,
    pub code_challenge_method: CodeChallengeMethod,
}

impl Pkce {
    /// Generate a fresh pair using the S256 method.
    pub fn new() -> Self {
        Self::with_method(CodeChallengeMethod::S256)
    }

    /// Generate a fresh pair using the given method.
    pub fn with_method(method: CodeChallengeMethod) -> Self {
        let verifier = generate_verifier();
        let challenge = derive_challenge(&verifier, method);
        Self {
            code_verifier: verifier,
            code_challenge: challenge,
            code_challenge_method: method,
        }
    }
}

impl Default for Pkce {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a cryptographically random code verifier.
///
/// 64 random bytes encoded as URL-safe base64 without padding give 86
/// characters, inside the 43-128 range RFC 7636 §4.1 requires.
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; 64];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Derive the code challenge for a verifier.
pub fn derive_challenge(verifier: &str, method: CodeChallengeMethod) -> String {
    match method {
        CodeChallengeMethod::S256 => {
            let hash = Sha256::digest(verifier.as_bytes());
            URL_SAFE_NO_PAD.encode(hash)
        }
        CodeChallengeMethod::Plain => verifier.to_string(),
    }
}
