//! Phabricator dashboard scanner.
//!
//! The dashboard is a sequence of `phui-box` panels, each carrying exactly
//! one `phui-header-header` title element followed by that panel's
//! `phui-oi-table-row` result rows. Headers therefore delimit panels: a
//! panel's rows are everything between its header and the next one.
//!
//! Only two panel titles count toward the badge. The match is exact
//! string membership against the deployment's UI text; panels like
//! "Waiting on Author" are ignored.

use regex::Regex;
use reviewbar_core::CheckError;
use std::sync::OnceLock;

/// Panel titles whose rows are pending on the signed-in user.
const REVIEW_PANEL_LABELS: [&str; 2] = ["Must Review", "Ready to Review"];

/// Panel title elements.
fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<h[1-6][^>]*class="[^"]*phui-header-header[^"]*"[^>]*>(.*?)</h[1-6]>"#)
            .expect("header pattern is valid")
    })
}

/// Result rows within a panel.
fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"class="[^"]*phui-oi-table-row"#).expect("row pattern is valid")
    })
}

/// Counts the pending reviews on a dashboard page.
///
/// A page with header elements but no matching panel titles is a valid
/// empty dashboard (count zero). A page with no `phui-header-header`
/// elements at all is not the dashboard (likely a login or error page)
/// and surfaces as a parse failure.
pub fn count_pending_reviews(html: &str) -> Result<u64, CheckError> {
    let headers: Vec<_> = header_re().captures_iter(html).collect();
    if headers.is_empty() {
        return Err(CheckError::Parse(
            "no dashboard headers found in response".to_string(),
        ));
    }

    let mut total: u64 = 0;
    for (i, caps) in headers.iter().enumerate() {
        let title = normalize_text(&caps[1]);
        if !REVIEW_PANEL_LABELS.contains(&title.as_str()) {
            continue;
        }

        let panel_start = caps.get(0).expect("full match").end();
        let panel_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(html.len(), |m| m.start());

        total += row_re().find_iter(&html[panel_start..panel_end]).count() as u64;
    }

    Ok(total)
}

/// Flattens an element body to its visible text: tags stripped, the
/// common entities decoded, whitespace collapsed.
fn normalize_text(fragment: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let tag_re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

    let text = tag_re.replace_all(fragment, "");
    let text = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(title: &str, rows: usize) -> String {
        let mut html = format!(
            r#"<div class="phui-box phui-box-border phui-object-box">
  <div class="phui-header-shell">
    <h1 class="phui-header-header">{title}</h1>
  </div>
  <table class="phui-oi-list-table">"#
        );
        for i in 0..rows {
            html.push_str(&format!(
                "\n    <tr class=\"phui-oi-table-row\"><td>D{i}</td></tr>"
            ));
        }
        html.push_str("\n  </table>\n</div>");
        html
    }

    fn dashboard(panels: &[(&str, usize)]) -> String {
        let mut html = String::from("<html><body><div class=\"phui-page\">");
        for (title, rows) in panels {
            html.push_str(&panel(title, *rows));
        }
        html.push_str("</div></body></html>");
        html
    }

    #[test]
    fn test_counts_matching_panels_only() {
        let html = dashboard(&[
            ("Must Review", 3),
            ("Ready to Review", 2),
            ("Waiting on Author", 5),
        ]);
        assert_eq!(count_pending_reviews(&html).unwrap(), 5);
    }

    #[test]
    fn test_single_panel() {
        let html = dashboard(&[("Must Review", 4)]);
        assert_eq!(count_pending_reviews(&html).unwrap(), 4);
    }

    #[test]
    fn test_no_matching_headers_is_zero_not_error() {
        let html = dashboard(&[("Waiting on Author", 7), ("Recently Closed", 1)]);
        assert_eq!(count_pending_reviews(&html).unwrap(), 0);
    }

    #[test]
    fn test_empty_panels_count_zero() {
        let html = dashboard(&[("Must Review", 0), ("Ready to Review", 0)]);
        assert_eq!(count_pending_reviews(&html).unwrap(), 0);
    }

    #[test]
    fn test_page_without_dashboard_markup_is_parse_error() {
        let html = "<html><body><form id=\"login\">Sign in</form></body></html>";
        let err = count_pending_reviews(html).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_header_with_nested_markup() {
        let html = dashboard(&[("<span class=\"phui-icon\"></span> Must Review", 2)]);
        assert_eq!(count_pending_reviews(&html).unwrap(), 2);
    }

    #[test]
    fn test_similar_but_different_label_ignored() {
        // Exact membership: a prefix or superstring of a label is not a
        // match.
        let html = dashboard(&[("Must Review Soon", 9), ("Ready to Review", 1)]);
        assert_eq!(count_pending_reviews(&html).unwrap(), 1);
    }

    #[test]
    fn test_rows_with_additional_classes() {
        let html = r#"<html><body>
<h1 class="phui-header-header">Must Review</h1>
<tr class="alt phui-oi-table-row highlighted"><td>D1</td></tr>
<tr class="phui-oi-table-row"><td>D2</td></tr>
</body></html>"#;
        assert_eq!(count_pending_reviews(html).unwrap(), 2);
    }
}
