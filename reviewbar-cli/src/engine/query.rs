//! Message-channel read path.
//!
//! Serves the popup's "get-reviews" request: the current per-provider
//! snapshot, straight from the last committed store state. A query never
//! triggers a cycle and never waits on the network; mid-cycle it sees
//! the pre-cycle values.

use reviewbar_core::ReviewCounts;
use reviewbar_store::ReviewStore;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

/// Requests the message channel serves.
pub enum ReviewsRequest {
    /// Current per-provider snapshot. The caller sums if it wants the
    /// total.
    Get {
        /// Reply channel.
        reply: oneshot::Sender<ReviewCounts>,
    },
}

/// Client handle for the message channel.
#[derive(Clone)]
pub struct ReviewsQueryHandle {
    tx: mpsc::Sender<ReviewsRequest>,
}

impl ReviewsQueryHandle {
    /// Requests the current snapshot. `None` when the server is gone.
    pub async fn get_reviews(&self) -> Option<ReviewCounts> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(ReviewsRequest::Get { reply }).await.ok()?;
        rx.await.ok()
    }
}

/// Spawns the query server over a review store.
pub fn spawn(store: ReviewStore) -> (ReviewsQueryHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(16);

    let task = tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            match request {
                ReviewsRequest::Get { reply } => {
                    let snapshot = store.snapshot().await;
                    let _ = reply.send(snapshot);
                }
            }
        }
        debug!("Query channel closed");
    });

    (ReviewsQueryHandle { tx }, task)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::orchestrator::UpdateEngine;
    use crate::engine::testutil::{settle, temp_settings, FakeCheck, RecordingBadge};
    use reviewbar_core::ProviderKind;
    use reviewbar_fetch::SessionStore;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_query_returns_committed_snapshot() {
        let store = ReviewStore::new();
        store.set_count(ProviderKind::Phabricator, 3).await;

        let (handle, _task) = spawn(store);
        let snapshot = handle.get_reviews().await.unwrap();
        assert_eq!(snapshot.get(ProviderKind::Phabricator), 3);
        assert_eq!(snapshot.get(ProviderKind::Bugzilla), 0);
    }

    #[tokio::test]
    async fn test_query_mid_cycle_sees_pre_cycle_state() {
        let gate = Arc::new(Notify::new());
        let check = FakeCheck::gated(ProviderKind::Bugzilla, 8, Arc::clone(&gate));

        let (_dir, settings) = temp_settings().await;
        let store = ReviewStore::new();
        store.set_count(ProviderKind::Bugzilla, 2).await;

        let engine = Arc::new(
            UpdateEngine::new(
                store.clone(),
                settings,
                vec![Box::new(check)],
                Box::new(RecordingBadge::new()),
            )
            .with_session(SessionStore::with_browsers(vec![])),
        );

        let (handle, _task) = spawn(store.clone());

        let runner = tokio::spawn({
            let engine = Arc::clone(&engine);
            async move { engine.run_cycle().await }
        });
        settle().await;
        assert!(store.cycle_in_flight().await);

        // The in-flight cycle hasn't committed; the query must answer
        // with the previous snapshot, immediately.
        let snapshot = handle.get_reviews().await.unwrap();
        assert_eq!(snapshot.get(ProviderKind::Bugzilla), 2);

        gate.notify_one();
        runner.await.unwrap();

        let snapshot = handle.get_reviews().await.unwrap();
        assert_eq!(snapshot.get(ProviderKind::Bugzilla), 8);
    }

    #[tokio::test]
    async fn test_query_never_triggers_a_cycle() {
        let check = FakeCheck::ok(ProviderKind::Phabricator, 1);
        let calls = check.counter();

        let (_dir, settings) = temp_settings().await;
        let store = ReviewStore::new();
        let _engine = UpdateEngine::new(
            store.clone(),
            settings,
            vec![Box::new(check)],
            Box::new(RecordingBadge::new()),
        );

        let (handle, _task) = spawn(store);
        for _ in 0..3 {
            handle.get_reviews().await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handle_reports_closed_server() {
        let store = ReviewStore::new();
        let (handle, task) = spawn(store);

        task.abort();
        let _ = task.await;

        assert!(handle.get_reviews().await.is_none());
    }
}
