//! Provider-related types.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Provider Kind
// ============================================================================

/// Supported review provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Mozilla Phabricator (code review).
    Phabricator,
    /// Bugzilla (bug tracking, review flags).
    Bugzilla,
}

impl ProviderKind {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Phabricator => "Phabricator",
            Self::Bugzilla => "Bugzilla",
        }
    }

    /// Returns the CLI name for this provider (lowercase, no spaces).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Phabricator => "phabricator",
            Self::Bugzilla => "bugzilla",
        }
    }

    /// Returns all available provider kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[Self::Phabricator, Self::Bugzilla]
    }

    /// Parses a CLI name into a provider kind.
    pub fn from_cli_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::all().iter().find(|k| k.cli_name() == name).copied()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(ProviderKind::Phabricator.display_name(), "Phabricator");
        assert_eq!(ProviderKind::Bugzilla.display_name(), "Bugzilla");
    }

    #[test]
    fn test_from_cli_name() {
        assert_eq!(
            ProviderKind::from_cli_name("phabricator"),
            Some(ProviderKind::Phabricator)
        );
        assert_eq!(
            ProviderKind::from_cli_name("Bugzilla"),
            Some(ProviderKind::Bugzilla)
        );
        assert_eq!(ProviderKind::from_cli_name("gitlab"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ProviderKind::Phabricator).unwrap();
        assert_eq!(json, "\"phabricator\"");

        let kind: ProviderKind = serde_json::from_str("\"bugzilla\"").unwrap();
        assert_eq!(kind, ProviderKind::Bugzilla);
    }
}
