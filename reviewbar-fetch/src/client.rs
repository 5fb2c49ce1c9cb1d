//! HTTP client with tracing and a domain allowlist.
//!
//! The wrapper keeps the transport policy in one place: request timeout,
//! user agent, and an allowlist restricting outbound requests to the known
//! provider hosts. Redirects follow reqwest's default policy, which the
//! Phabricator dashboard fetch relies on.

use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for ReviewBar.
const USER_AGENT: &str = concat!("reviewbar/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing, timeout, and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built. This should only occur
    /// if the system's TLS/SSL configuration is fundamentally broken,
    /// making network operations impossible. This is considered
    /// unrecoverable at runtime.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to create HTTP client: {}. \
                    This usually indicates a broken TLS/SSL configuration.",
                    e
                )
            });

        Self {
            inner: client,
            allowed_domains: None,
        }
    }

    /// Restricts this client to a set of domains (and their subdomains).
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), HttpError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Rejects non-success statuses.
    fn check_status(response: &Response) -> Result<(), HttpError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(HttpError::Status(status.as_u16()))
        }
    }

    /// Performs a GET request and returns the response body as text.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_text(&self, url: &str) -> Result<String, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request");

        let response = self.inner.get(url).send().await?;
        debug!(status = %response.status(), "Response received");
        Self::check_status(&response)?;
        Ok(response.text().await?)
    }

    /// Performs a GET request with a cookie header and returns the body as
    /// text.
    ///
    /// Used by checks that authenticate with an ambient browser session.
    #[instrument(skip(self, cookies), fields(url = %url))]
    pub async fn get_text_with_cookies(
        &self,
        url: &str,
        cookies: &str,
    ) -> Result<String, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request with cookies");

        let response = self
            .inner
            .get(url)
            .header(header::COOKIE, cookies)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Self::check_status(&response)?;
        Ok(response.text().await?)
    }

    /// Performs a POST request with a JSON body and deserializes the JSON
    /// response.
    ///
    /// No cookie header is ever attached: the client carries no cookie
    /// store, so API-key endpoints see the key and nothing else.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, HttpError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.is_domain_allowed(url)?;
        debug!("POST request with JSON");

        let response = self.inner.post(url).json(body).send().await?;
        debug!(status = %response.status(), "Response received");
        Self::check_status(&response)?;
        Ok(response.json().await?)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowlist_accepts_listed_domain() {
        let client =
            HttpClient::new().with_allowed_domains(vec!["bugzilla.mozilla.org".to_string()]);
        assert!(client
            .is_domain_allowed("https://bugzilla.mozilla.org/jsonrpc.cgi")
            .is_ok());
    }

    #[test]
    fn test_allowlist_accepts_subdomain() {
        let client = HttpClient::new().with_allowed_domains(vec!["mozilla.org".to_string()]);
        assert!(client
            .is_domain_allowed("https://bugzilla.mozilla.org/jsonrpc.cgi")
            .is_ok());
    }

    #[test]
    fn test_allowlist_rejects_unlisted_domain() {
        let client =
            HttpClient::new().with_allowed_domains(vec!["bugzilla.mozilla.org".to_string()]);
        let err = client.is_domain_allowed("https://example.com/").unwrap_err();
        assert!(matches!(err, HttpError::DomainNotAllowed(_)));
    }

    #[test]
    fn test_no_allowlist_means_no_restriction() {
        let client = HttpClient::new();
        assert!(client.is_domain_allowed("https://example.com/").is_ok());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let client = HttpClient::new().with_allowed_domains(vec!["mozilla.org".to_string()]);
        assert!(matches!(
            client.is_domain_allowed("not a url"),
            Err(HttpError::InvalidUrl(_))
        ));
    }
}
