//! Configuration reactor.
//!
//! Consumes settings-change events and turns them into engine actions:
//! an interval change reschedules the timer (first fire a full period
//! out), a credential or provider-set change triggers one immediate cycle
//! so the edit is reflected without waiting for the next timer fire.

use reviewbar_store::Settings;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::orchestrator::UpdateEngine;
use crate::engine::scheduler::Scheduler;

/// Reacts to configuration changes for the lifetime of the process.
pub struct ConfigReactor;

impl ConfigReactor {
    /// Spawns the reactor task over a settings subscription.
    ///
    /// The scheduler is shared behind a mutex: timer resets are
    /// serialized between the reactor and whoever armed the initial
    /// schedule.
    pub fn spawn(
        mut settings_rx: watch::Receiver<Settings>,
        scheduler: Arc<Mutex<Scheduler>>,
        engine: Arc<UpdateEngine>,
    ) -> JoinHandle<()> {
        // Baseline captured before the task runs: a change landing between
        // subscription and the first poll must still be diffed and acted on.
        let mut last = settings_rx.borrow_and_update().clone();

        tokio::spawn(async move {
            while settings_rx.changed().await.is_ok() {
                let current = settings_rx.borrow_and_update().clone();

                if current.update_interval_minutes != last.update_interval_minutes {
                    info!(
                        minutes = current.update_interval_minutes,
                        "Interval changed, rescheduling"
                    );
                    scheduler.lock().await.schedule(current.update_interval());
                }

                let credentials_changed = current.bugzilla_api_key != last.bugzilla_api_key
                    || current.enabled_providers != last.enabled_providers;
                if credentials_changed {
                    info!("Credentials changed, running immediate cycle");
                    engine.run_cycle().await;
                }

                last = current;
            }

            debug!("Settings channel closed, reactor exiting");
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::{settle, temp_settings, FakeCheck, RecordingBadge};
    use reviewbar_core::ProviderKind;
    use reviewbar_fetch::SessionStore;
    use reviewbar_store::{ReviewStore, SettingsStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::advance;

    const MINUTE: Duration = Duration::from_secs(60);

    struct Fixture {
        _dir: tempfile::TempDir,
        settings: SettingsStore,
        calls: Arc<AtomicUsize>,
        scheduler: Arc<Mutex<Scheduler>>,
        _reactor: JoinHandle<()>,
    }

    async fn fixture() -> Fixture {
        let (dir, settings) = temp_settings().await;
        let check = FakeCheck::ok(ProviderKind::Bugzilla, 1);
        let calls = check.counter();
        let engine = Arc::new(
            UpdateEngine::new(
                ReviewStore::new(),
                settings.clone(),
                vec![Box::new(check)],
                Box::new(RecordingBadge::new()),
            )
            .with_session(SessionStore::with_browsers(vec![])),
        );
        let scheduler = Arc::new(Mutex::new(Scheduler::new(Arc::clone(&engine))));
        let reactor = ConfigReactor::spawn(
            settings.subscribe(),
            Arc::clone(&scheduler),
            Arc::clone(&engine),
        );

        Fixture {
            _dir: dir,
            settings,
            calls,
            scheduler,
            _reactor: reactor,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_credential_change_triggers_immediate_cycle() {
        let fx = fixture().await;

        fx.settings
            .set_bugzilla_api_key(Some("key123".to_string()))
            .await
            .unwrap();
        settle().await;

        // No timer was ever armed; the cycle came from the change event.
        assert_eq!(fx.calls.load(Ordering::SeqCst), 1);
        assert!(!fx.scheduler.lock().await.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_toggle_triggers_immediate_cycle() {
        let fx = fixture().await;

        fx.settings
            .set_provider_enabled(ProviderKind::Phabricator, false)
            .await
            .unwrap();
        settle().await;

        assert_eq!(fx.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_change_reschedules_without_immediate_cycle() {
        let fx = fixture().await;
        fx.scheduler.lock().await.schedule(5 * MINUTE);

        fx.settings.set_update_interval(1).await.unwrap();
        settle().await;

        // No immediate cycle on an interval-only change.
        assert_eq!(fx.calls.load(Ordering::SeqCst), 0);
        assert!(fx.scheduler.lock().await.is_armed());

        // And no fire earlier than the new period.
        advance(MINUTE - Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(fx.calls.load(Ordering::SeqCst), 0);

        advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(fx.calls.load(Ordering::SeqCst), 1);

        // Steady at the new cadence thereafter.
        advance(MINUTE).await;
        settle().await;
        assert_eq!(fx.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrelated_change_does_nothing() {
        let fx = fixture().await;

        fx.settings
            .update(|s| s.log_level = reviewbar_store::LogLevel::Debug)
            .await
            .unwrap();
        settle().await;

        assert_eq!(fx.calls.load(Ordering::SeqCst), 0);
        assert!(!fx.scheduler.lock().await.is_armed());
    }
}
