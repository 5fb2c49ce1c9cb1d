//! Check context providing access to transport and credentials.
//!
//! The context is passed to every check and carries the shared HTTP
//! client, the browser session probe, and the user's configured
//! credentials. Checks own no I/O handles of their own.

use reviewbar_fetch::{HttpClient, SessionStore};

use crate::bugzilla::BUGZILLA_HOST;
use crate::phabricator::PHABRICATOR_HOST;

// ============================================================================
// Credentials
// ============================================================================

/// Explicitly configured provider credentials.
///
/// The Phabricator session is deliberately absent here: it is read
/// ambiently from the browser cookie jar, not stored in configuration.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Bugzilla API key, if the user configured one.
    pub bugzilla_api_key: Option<String>,
}

impl Credentials {
    /// No credentials configured.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns the Bugzilla API key if present and non-empty.
    pub fn bugzilla_api_key(&self) -> Option<&str> {
        self.bugzilla_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
    }
}

// ============================================================================
// Check Context
// ============================================================================

/// Shared resources for one update cycle's checks.
#[derive(Debug, Clone)]
pub struct CheckContext {
    /// HTTP client, restricted to the provider hosts.
    pub http: HttpClient,
    /// Browser session-cookie probe.
    pub session: SessionStore,
    /// Configured credentials.
    pub credentials: Credentials,
}

impl CheckContext {
    /// Creates a context with the default transport: a 30-second-timeout
    /// client allowlisted to the two provider hosts, and all installed
    /// browsers probed for sessions.
    pub fn new(credentials: Credentials) -> Self {
        let http = HttpClient::new().with_allowed_domains(vec![
            PHABRICATOR_HOST.to_string(),
            BUGZILLA_HOST.to_string(),
        ]);

        Self {
            http,
            session: SessionStore::discover(),
            credentials,
        }
    }

    /// Replaces the session probe (used to pin the browser set).
    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = session;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_counts_as_absent() {
        let creds = Credentials {
            bugzilla_api_key: Some(String::new()),
        };
        assert!(creds.bugzilla_api_key().is_none());

        let creds = Credentials {
            bugzilla_api_key: Some("abcd1234".to_string()),
        };
        assert_eq!(creds.bugzilla_api_key(), Some("abcd1234"));

        assert!(Credentials::none().bugzilla_api_key().is_none());
    }
}
