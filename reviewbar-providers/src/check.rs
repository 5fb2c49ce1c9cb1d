//! The provider check trait.

use async_trait::async_trait;
use reviewbar_core::{ProviderKind, ProviderResult};

use crate::context::CheckContext;

/// One review provider's pending-count check.
///
/// Implementations are responsible for:
/// - Locating their credential (ambient session cookie or configured key)
/// - Fetching the provider's review data
/// - Extracting a pending-review count from the response
///
/// ## Contract
///
/// `check` never fails at the call boundary. Missing credentials are not
/// an error: the check returns `Ok(0)` without any network call. Real
/// failures (transport, parse, provider-reported) come back as an error
/// [`ProviderResult`] so the engine can keep the previous count.
#[async_trait]
pub trait ReviewCheck: Send + Sync {
    /// The provider this check handles.
    fn kind(&self) -> ProviderKind;

    /// The URL this check queries.
    fn endpoint(&self) -> String;

    /// Whether a credential is currently present for this provider.
    ///
    /// A quick local probe (cookie database or settings), never a network
    /// call.
    fn is_configured(&self, ctx: &CheckContext) -> bool;

    /// Runs the check and returns the pending-review count or a failure.
    async fn check(&self, ctx: &CheckContext) -> ProviderResult;
}
