//! Phabricator review check.
//!
//! Authenticates with the ambient `phsid` browser session cookie. No
//! cookie means the user isn't signed in to Phabricator, which is a
//! count of zero, not a failure.

pub mod parser;

use async_trait::async_trait;
use reviewbar_core::{ProviderKind, ProviderResult};
use tracing::{debug, warn};
use url::Url;

use crate::check::ReviewCheck;
use crate::context::CheckContext;

// ============================================================================
// Constants
// ============================================================================

/// Phabricator deployment host.
pub const PHABRICATOR_HOST: &str = "phabricator.services.mozilla.com";

/// Phabricator root URL.
const PHABRICATOR_ROOT: &str = "https://phabricator.services.mozilla.com";

/// Dashboard listing revisions that involve the signed-in user.
const DASHBOARD_PATH: &str = "/differential/query/active/";

/// Phabricator session cookie name.
pub const SESSION_COOKIE: &str = "phsid";

// ============================================================================
// Check
// ============================================================================

/// Pending-review check against the Phabricator dashboard.
#[derive(Debug)]
pub struct PhabricatorCheck {
    root: String,
}

impl PhabricatorCheck {
    /// Creates a check against the fixed deployment.
    pub fn new() -> Self {
        Self {
            root: PHABRICATOR_ROOT.to_string(),
        }
    }

    /// Host component of the deployment root, for cookie scoping.
    fn host(&self) -> String {
        Url::parse(&self.root)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| PHABRICATOR_HOST.to_string())
    }
}

impl Default for PhabricatorCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewCheck for PhabricatorCheck {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Phabricator
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.root, DASHBOARD_PATH)
    }

    fn is_configured(&self, ctx: &CheckContext) -> bool {
        ctx.session
            .find_cookie(&self.host(), SESSION_COOKIE)
            .is_some()
    }

    async fn check(&self, ctx: &CheckContext) -> ProviderResult {
        let Some(cookie) = ctx.session.find_cookie(&self.host(), SESSION_COOKIE) else {
            debug!("No Phabricator session cookie, reporting zero");
            return ProviderResult::ok(self.kind(), 0);
        };

        // Redirects are followed; a half-expired session that bounces
        // through the login flow still lands on a parseable page.
        let body = match ctx
            .http
            .get_text_with_cookies(&self.endpoint(), &cookie.to_header())
            .await
        {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Phabricator dashboard fetch failed");
                return ProviderResult::err(self.kind(), e.into());
            }
        };

        match parser::count_pending_reviews(&body) {
            Ok(count) => {
                debug!(count, "Phabricator check complete");
                ProviderResult::ok(self.kind(), count)
            }
            Err(e) => {
                warn!(error = %e, "Phabricator dashboard parse failed");
                ProviderResult::err(self.kind(), e)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Credentials;
    use reviewbar_fetch::SessionStore;

    #[test]
    fn test_endpoint() {
        let check = PhabricatorCheck::new();
        assert_eq!(
            check.endpoint(),
            "https://phabricator.services.mozilla.com/differential/query/active/"
        );
    }

    #[tokio::test]
    async fn test_no_session_reports_zero_without_network() {
        let check = PhabricatorCheck::new();
        // An empty browser set means no session cookie can exist; the
        // check must come back Ok(0) without attempting the dashboard
        // fetch (there is no server to answer it here).
        let ctx = CheckContext::new(Credentials::none())
            .with_session(SessionStore::with_browsers(vec![]));

        assert!(!check.is_configured(&ctx));

        let result = check.check(&ctx).await;
        assert_eq!(result.provider, ProviderKind::Phabricator);
        assert_eq!(result.outcome.unwrap(), 0);
    }
}
