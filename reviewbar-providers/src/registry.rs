//! Provider registry.
//!
//! Central construction point for the provider checks. The set is fixed:
//! this tool targets one Phabricator and one Bugzilla deployment.

use reviewbar_core::ProviderKind;

use crate::bugzilla::BugzillaCheck;
use crate::check::ReviewCheck;
use crate::phabricator::PhabricatorCheck;

/// Registry of all provider checks.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Builds one check per provider, in [`ProviderKind::all`] order.
    pub fn checks() -> Vec<Box<dyn ReviewCheck>> {
        vec![
            Box::new(PhabricatorCheck::new()),
            Box::new(BugzillaCheck::new()),
        ]
    }

    /// Builds the check for a single provider.
    pub fn get(kind: ProviderKind) -> Box<dyn ReviewCheck> {
        match kind {
            ProviderKind::Phabricator => Box::new(PhabricatorCheck::new()),
            ProviderKind::Bugzilla => Box::new(BugzillaCheck::new()),
        }
    }

    /// All provider kinds.
    pub fn kinds() -> &'static [ProviderKind] {
        ProviderKind::all()
    }
}

// ============================================================================
// Tests
// ============================================================================
