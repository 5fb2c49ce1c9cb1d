//! JSON output formatting.

use reviewbar_core::{ProviderKind, ReviewCounts};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Serialized shape of the aggregate snapshot.
///
/// `counts` mirrors the message-channel reply: one entry per provider,
/// the caller sums if it wants the total (which is included here for
/// convenience).
#[derive(Serialize)]
struct SnapshotOutput {
    counts: BTreeMap<&'static str, u64>,
    total: u64,
    badge: Option<String>,
    errors: BTreeMap<&'static str, String>,
}

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }

    /// Formats the aggregate snapshot.
    pub fn format_snapshot(
        &self,
        counts: &ReviewCounts,
        errors: &HashMap<ProviderKind, String>,
    ) -> Result<String, serde_json::Error> {
        let output = SnapshotOutput {
            counts: counts.iter().map(|(k, c)| (k.cli_name(), c)).collect(),
            total: counts.total(),
            badge: counts.badge_text(),
            errors: errors
                .iter()
                .map(|(k, e)| (k.cli_name(), e.clone()))
                .collect(),
        };
        self.render(&output)
    }

    /// Formats the provider listing.
    pub fn format_providers(
        &self,
        rows: &[(ProviderKind, bool, bool, String)],
    ) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct ProviderRow<'a> {
            provider: &'static str,
            enabled: bool,
            configured: bool,
            endpoint: &'a str,
        }

        let rows: Vec<ProviderRow> = rows
            .iter()
            .map(|(kind, enabled, configured, endpoint)| ProviderRow {
                provider: kind.cli_name(),
                enabled: *enabled,
                configured: *configured,
                endpoint,
            })
            .collect();
        self.render(&rows)
    }
}
