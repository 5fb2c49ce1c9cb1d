//! Review-count types.
//!
//! [`ReviewCounts`] is the aggregate snapshot published to the badge and the
//! message channel; [`ProviderResult`] is the transient outcome of a single
//! provider check, consumed by the update engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CheckError;
use crate::models::provider::ProviderKind;

// ============================================================================
// Review Counts
// ============================================================================

/// Per-provider pending-review counts.
///
/// A value snapshot of the aggregate state: every known provider has an
/// entry, initialized to zero at process start. The sum of all entries is
/// exactly what the badge renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCounts {
    counts: HashMap<ProviderKind, u64>,
}

impl ReviewCounts {
    /// Creates a snapshot with every provider at zero.
    pub fn new() -> Self {
        let counts = ProviderKind::all().iter().map(|k| (*k, 0)).collect();
        Self { counts }
    }

    /// Returns the count for a provider (zero if never set).
    pub fn get(&self, kind: ProviderKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Sets the count for a provider.
    pub fn set(&mut self, kind: ProviderKind, count: u64) {
        self.counts.insert(kind, count);
    }

    /// Iterates over `(provider, count)` pairs in the order of
    /// [`ProviderKind::all`].
    pub fn iter(&self) -> impl Iterator<Item = (ProviderKind, u64)> + '_ {
        ProviderKind::all().iter().map(|k| (*k, self.get(*k)))
    }

    /// Sum of all provider counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Badge text for this snapshot.
    ///
    /// `None` clears the badge (total is exactly zero); otherwise the
    /// decimal string of the total. No localization, no display cap.
    pub fn badge_text(&self) -> Option<String> {
        match self.total() {
            0 => None,
            total => Some(total.to_string()),
        }
    }
}

impl Default for ReviewCounts {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Provider Result
// ============================================================================

/// Outcome of a single provider check.
///
/// Produced by a check, consumed immediately by the update engine, never
/// persisted. An unconfigured provider yields `Ok(0)`, not an error.
#[derive(Debug, Clone)]
pub struct ProviderResult {
    /// The provider that was checked.
    pub provider: ProviderKind,
    /// Pending-review count, or why it could not be determined.
    pub outcome: Result<u64, CheckError>,
}

impl ProviderResult {
    /// A successful check result.
    pub fn ok(provider: ProviderKind, count: u64) -> Self {
        Self {
            provider,
            outcome: Ok(count),
        }
    }

    /// A failed check result.
    pub fn err(provider: ProviderKind, error: CheckError) -> Self {
        Self {
            provider,
            outcome: Err(error),
        }
    }

    /// Returns true if the check succeeded.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
