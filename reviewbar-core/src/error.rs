//! Core error types for `ReviewBar`.

use thiserror::Error;

/// Failure classification for a provider check.
///
/// A missing credential is deliberately *not* an error: an unconfigured
/// provider contributes a count of zero and is skipped silently at the
/// check boundary.
#[derive(Debug, Clone, Error)]
pub enum CheckError {
    /// Network, DNS, or TLS failure reaching the provider.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered, but the body had an unexpected shape.
    #[error("unparseable response: {0}")]
    Parse(String),

    /// The provider's own API returned an explicit error payload.
    #[error("provider reported error: {0}")]
    Provider(String),
}

impl CheckError {
    /// Short label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Parse(_) => "parse",
            Self::Provider(_) => "provider",
        }
    }
}
