//! Bugzilla review check.
//!
//! Authenticates with a configured API key and counts the `review` flags
//! waiting on the user via the dashboard flag query. No key means the
//! provider isn't configured: count zero, no network call.

pub mod rpc;

use async_trait::async_trait;
use reviewbar_core::{ProviderKind, ProviderResult};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};

use crate::check::ReviewCheck;
use crate::context::CheckContext;

pub use rpc::BUGZILLA_HOST;
use rpc::{count_review_flags, FlagQueryRequest, FlagQueryResponse, RPC_ENDPOINT};

// ============================================================================
// Check
// ============================================================================

/// Pending-review check against the Bugzilla flag query.
#[derive(Debug)]
pub struct BugzillaCheck {
    endpoint: String,
    next_id: AtomicU32,
}

impl BugzillaCheck {
    /// Creates a check against the fixed deployment.
    pub fn new() -> Self {
        Self {
            endpoint: RPC_ENDPOINT.to_string(),
            next_id: AtomicU32::new(1),
        }
    }
}

impl Default for BugzillaCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewCheck for BugzillaCheck {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bugzilla
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn is_configured(&self, ctx: &CheckContext) -> bool {
        ctx.credentials.bugzilla_api_key().is_some()
    }

    async fn check(&self, ctx: &CheckContext) -> ProviderResult {
        let Some(api_key) = ctx.credentials.bugzilla_api_key() else {
            debug!("No Bugzilla API key, reporting zero");
            return ProviderResult::ok(self.kind(), 0);
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = FlagQueryRequest::new(id, api_key);

        // The client never attaches cookies, so the key is the only
        // credential the server sees.
        let response: FlagQueryResponse =
            match ctx.http.post_json(&self.endpoint, &request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "Bugzilla flag query failed");
                    return ProviderResult::err(self.kind(), e.into());
                }
            };

        match count_review_flags(&response) {
            Ok(count) => {
                debug!(count, "Bugzilla check complete");
                ProviderResult::ok(self.kind(), count)
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Bugzilla flag query rejected");
                ProviderResult::err(self.kind(), e)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
