//! Fetch error types.

use reviewbar_core::CheckError;
use thiserror::Error;

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Unexpected HTTP status.
    #[error("Unexpected status code: {0}")]
    Status(u16),
}

impl From<HttpError> for CheckError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Request(e) if e.is_decode() => CheckError::Parse(e.to_string()),
            HttpError::Request(e) => CheckError::Transport(e.to_string()),
            HttpError::DomainNotAllowed(host) => {
                CheckError::Transport(format!("domain not allowed: {host}"))
            }
            HttpError::InvalidUrl(url) => CheckError::Transport(format!("invalid URL: {url}")),
            HttpError::Status(code) => CheckError::Transport(format!("HTTP {code}")),
        }
    }
}

// ============================================================================
// Cookie Error
// ============================================================================

/// Error type for browser cookie probing.
///
/// These never reach the update engine: a failed probe is treated as "no
/// session" at the check boundary, with the failure logged.
#[derive(Debug, Error)]
pub enum CookieError {
    /// Cookie database not found.
    #[error("Cookie database not found for {browser}: {path}")]
    DatabaseNotFound {
        /// Browser name.
        browser: String,
        /// Expected database path.
        path: String,
    },

    /// Failed to read cookies.
    #[error("Failed to read cookies: {0}")]
    ReadFailed(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
