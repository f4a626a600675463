//! Bearer-injecting HTTP client wrapper.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;

use crate::error::{OAuth2Error, Result};
use crate::grant::TokenSource;

/// HTTP client that authorizes every outgoing request with a bearer token
/// from its grant.
///
/// Before each request it calls [`TokenSource::ensure_valid_token`] (which
/// fetches or refreshes as needed) and attaches the `Authorization` header.
/// Token freshness is guaranteed pre-flight only; there is no retry on 401.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use oauth2_client::grant::ClientCredentialsGrant;
/// use oauth2_client::OAuth2Client;
///
/// # async fn example() -> oauth2_client::Result<()> {
/// let grant = ClientCredentialsGrant::new(
///     "https://auth.example.com/token",
///     "client",
///     "secret",
/// );
/// let client = OAuth2Client::new(Arc::new(grant));
/// let response = client.get("https://api.example.com/resource").await?;
/// # Ok(())
/// # }
/// ```
pub struct OAuth2Client {
    http: reqwest::Client,
    grant: Arc<dyn TokenSource>,
}

impl OAuth2Client {
    pub fn new(grant: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            grant,
        }
    }

    /// Use a shared HTTP client instead of a dedicated one.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Start an authorized request; the caller finishes and sends it.
    pub async fn request(&self, method: Method, url: &str) -> Result<reqwest::RequestBuilder> {
        let token = self.grant.ensure_valid_token().await?;
        let header = HeaderValue::from_str(&token.authorization_header()).map_err(|_| {
            OAuth2Error::InvalidResponse(
                "token contains characters not valid in an Authorization header".to_string(),
            )
        })?;
        Ok(self.http.request(method, url).header(AUTHORIZATION, header))
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.send(Method::GET, url).await
    }

    pub async fn post(&self, url: &str) -> Result<reqwest::Response> {
        self.send(Method::POST, url).await
    }

    pub async fn put(&self, url: &str) -> Result<reqwest::Response> {
        self.send(Method::PUT, url).await
    }

    pub async fn delete(&self, url: &str) -> Result<reqwest::Response> {
        self.send(Method::DELETE, url).await
    }

    async fn send(&self, method: Method, url: &str) -> Result<reqwest::Response> {
        let request = self.request(method, url).await?;
        Ok(request.send().await?)
    }
}
