//! Aggregate review state.
//!
//! The single owner of the per-provider pending-review counts. The update
//! engine is the only writer; the badge, the message channel, and the CLI
//! read committed snapshots. Readers never wait on the network: a
//! snapshot is a clone of the last committed state.

use chrono::{DateTime, Utc};
use reviewbar_core::{ProviderKind, ReviewCounts};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

use crate::error::StoreError;

// ============================================================================
// Inner State
// ============================================================================

/// Internal state for the review store.
struct ReviewStoreInner {
    /// Per-provider counts. Every provider has an entry, zero at start.
    counts: ReviewCounts,
    /// Last failure per provider, cleared on the next success.
    errors: HashMap<ProviderKind, String>,
    /// When the last cycle completed.
    last_cycle: Option<DateTime<Utc>>,
    /// Whether a cycle currently holds the write side.
    cycle_in_progress: bool,
}

impl Default for ReviewStoreInner {
    fn default() -> Self {
        Self {
            counts: ReviewCounts::new(),
            errors: HashMap::new(),
            last_cycle: None,
            cycle_in_progress: false,
        }
    }
}

// ============================================================================
// Review Store
// ============================================================================

/// Aggregate pending-review state, observable via a watch channel.
#[derive(Clone)]
pub struct ReviewStore {
    inner: Arc<RwLock<ReviewStoreInner>>,
    notify: watch::Sender<u64>,
}

impl ReviewStore {
    /// Creates a store with every provider at zero.
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(ReviewStoreInner::default())),
            notify,
        }
    }

    // ========================================================================
    // Snapshot Access
    // ========================================================================

    /// Returns a snapshot of the committed counts.
    pub async fn snapshot(&self) -> ReviewCounts {
        self.inner.read().await.counts.clone()
    }

    /// Returns the committed count for one provider.
    pub async fn count(&self, provider: ProviderKind) -> u64 {
        self.inner.read().await.counts.get(provider)
    }

    /// Sets the count for a provider and clears its error.
    ///
    /// Engine-only: each call commits one provider's result atomically, so
    /// concurrent readers see either the old or the new count, never a
    /// partial state.
    pub async fn set_count(&self, provider: ProviderKind, count: u64) {
        {
            let mut inner = self.inner.write().await;
            inner.counts.set(provider, count);
            inner.errors.remove(&provider);
        }
        self.notify_change();
        debug!(provider = %provider, count, "Count updated");
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Records a failure for a provider. The provider's committed count is
    /// left untouched: stale-but-valid beats zeroing out on a transient
    /// failure.
    pub async fn set_error(&self, provider: ProviderKind, error: String) {
        {
            let mut inner = self.inner.write().await;
            inner.errors.insert(provider, error);
        }
        self.notify_change();
        warn!(provider = %provider, "Error recorded, keeping previous count");
    }

    /// Returns the last recorded failure for a provider.
    pub async fn error(&self, provider: ProviderKind) -> Option<String> {
        self.inner.read().await.errors.get(&provider).cloned()
    }

    /// Returns all recorded failures.
    pub async fn all_errors(&self) -> HashMap<ProviderKind, String> {
        self.inner.read().await.errors.clone()
    }

    // ========================================================================
    // Cycle Guard
    // ========================================================================

    /// Claims the write side for one update cycle.
    ///
    /// Fails if a cycle is already in flight; the caller is expected to
    /// drop its trigger (coalescing), not to wait.
    pub async fn begin_cycle(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.cycle_in_progress {
            return Err(StoreError::CycleInProgress);
        }
        inner.cycle_in_progress = true;
        Ok(())
    }

    /// Releases the write side and stamps the cycle completion time.
    pub async fn end_cycle(&self) {
        {
            let mut inner = self.inner.write().await;
            inner.cycle_in_progress = false;
            inner.last_cycle = Some(Utc::now());
        }
        self.notify_change();
    }

    /// Whether a cycle currently holds the write side.
    pub async fn cycle_in_flight(&self) -> bool {
        self.inner.read().await.cycle_in_progress
    }

    /// When the last cycle completed.
    pub async fn last_cycle(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_cycle
    }

    // ========================================================================
    // Observable
    // ========================================================================

    /// Subscribes to store changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    fn notify_change(&self) {
        self.notify.send_modify(|version| *version += 1);
    }
}

impl Default for ReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_with_all_zeros() {
        let store = ReviewStore::new();
        let snapshot = store.snapshot().await;
        for kind in ProviderKind::all() {
            assert_eq!(snapshot.get(*kind), 0);
        }
        assert_eq!(snapshot.total(), 0);
        assert!(store.last_cycle().await.is_none());
    }

    #[tokio::test]
    async fn test_set_count_visible_in_snapshot() {
        let store = ReviewStore::new();
        store.set_count(ProviderKind::Phabricator, 3).await;
        store.set_count(ProviderKind::Bugzilla, 2).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.get(ProviderKind::Phabricator), 3);
        assert_eq!(snapshot.get(ProviderKind::Bugzilla), 2);
        assert_eq!(snapshot.total(), 5);
    }

    #[tokio::test]
    async fn test_error_preserves_count() {
        let store = ReviewStore::new();
        store.set_count(ProviderKind::Bugzilla, 4).await;

        store
            .set_error(ProviderKind::Bugzilla, "connection refused".to_string())
            .await;

        assert_eq!(store.count(ProviderKind::Bugzilla).await, 4);
        assert!(store.error(ProviderKind::Bugzilla).await.is_some());
    }

    #[tokio::test]
    async fn test_success_clears_error() {
        let store = ReviewStore::new();
        store
            .set_error(ProviderKind::Phabricator, "boom".to_string())
            .await;
        store.set_count(ProviderKind::Phabricator, 1).await;

        assert!(store.error(ProviderKind::Phabricator).await.is_none());
        assert!(store.all_errors().await.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_guard_rejects_overlap() {
        let store = ReviewStore::new();

        store.begin_cycle().await.unwrap();
        assert!(store.cycle_in_flight().await);

        // Second cycle must be refused while the first holds the guard.
        assert!(matches!(
            store.begin_cycle().await,
            Err(StoreError::CycleInProgress)
        ));

        store.end_cycle().await;
        assert!(!store.cycle_in_flight().await);
        assert!(store.last_cycle().await.is_some());

        // And allowed again afterwards.
        store.begin_cycle().await.unwrap();
    }

    #[tokio::test]
    async fn test_subscribers_notified_on_write() {
        let store = ReviewStore::new();
        let mut rx = store.subscribe();

        store.set_count(ProviderKind::Bugzilla, 1).await;
        rx.changed().await.unwrap();

        assert_eq!(store.count(ProviderKind::Bugzilla).await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let store = ReviewStore::new();
        let before = store.snapshot().await;
        store.set_count(ProviderKind::Phabricator, 9).await;

        // The earlier snapshot is a value, not a view.
        assert_eq!(before.get(ProviderKind::Phabricator), 0);
    }
}
