//! Text output formatting.

use chrono::{DateTime, Local, Utc};
use reviewbar_core::{ProviderKind, ReviewCounts};
use std::collections::HashMap;
use std::fmt::Write as _;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Formats the aggregate snapshot for the `check` command.
    pub fn format_snapshot(
        &self,
        counts: &ReviewCounts,
        errors: &HashMap<ProviderKind, String>,
        last_cycle: Option<DateTime<Utc>>,
    ) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.paint(BOLD, "Pending reviews"));

        for (kind, count) in counts.iter() {
            let _ = write!(out, "  {:<12} {}", kind.display_name(), count);
            if let Some(error) = errors.get(&kind) {
                let note = format!("  (stale: {error})");
                let _ = write!(out, "{}", self.paint(RED, &note));
            }
            let _ = writeln!(out);
        }

        let total_line = format!("  {:<12} {}", "Total", counts.total());
        let _ = writeln!(out, "{}", self.paint(BOLD, &total_line));

        let badge = counts
            .badge_text()
            .unwrap_or_else(|| "(cleared)".to_string());
        let _ = writeln!(out, "  {:<12} {}", "Badge", badge);

        if let Some(when) = last_cycle {
            let stamp = when.with_timezone(&Local).format("%H:%M:%S");
            let line = format!("Last updated: {stamp}");
            let _ = writeln!(out, "{}", self.paint(DIM, &line));
        }

        out
    }

    /// Formats one provider row for the `providers` command.
    pub fn format_provider(
        &self,
        kind: ProviderKind,
        enabled: bool,
        configured: bool,
        endpoint: &str,
    ) -> String {
        let status = match (enabled, configured) {
            (false, _) => "disabled",
            (true, false) => "not configured",
            (true, true) => "ready",
        };
        let endpoint = self.paint(DIM, endpoint);
        format!("  {:<12} {:<15} {}", kind.display_name(), status, endpoint)
    }
}
