//! oauth2-client — OAuth2 client runtime for reqwest
//!
//! Obtains, caches, refreshes, and injects bearer tokens for outgoing HTTP
//! requests. Supports the authorization code, client credentials, resource
//! owner password credentials, refresh token, and device code grants
//! (RFC 6749 / RFC 8628), with optional PKCE (RFC 7636).
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use oauth2_client::grant::ClientCredentialsGrant;
//! use oauth2_client::OAuth2Client;
//!
//! # async fn example() -> oauth2_client::Result<()> {
//! let grant = ClientCredentialsGrant::new(
//!     "https://auth.example.com/token",
//!     "my-client",
//!     "my-secret",
//! )
//! .with_scope("profile email");
//!
//! let client = OAuth2Client::new(Arc::new(grant));
//! let response = client.get("https://api.example.com/resource").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod grant;
pub mod interceptor;
pub mod pkce;
pub mod token;
pub mod types;

pub use error::{OAuth2Error, Result};
pub use interceptor::OAuth2Client;
pub use pkce::{CodeChallengeMethod, Pkce};
pub use token::Token;
