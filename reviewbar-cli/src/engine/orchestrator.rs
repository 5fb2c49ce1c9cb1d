//! Update orchestration.
//!
//! One cycle runs every enabled provider check concurrently, merges the
//! results into the review store, and republishes the badge. The checks
//! are independent: one provider failing or lacking a credential never
//! stops the other from updating its own slot.

use futures::future::join_all;
use reviewbar_providers::{CheckContext, Credentials, ReviewCheck};
use reviewbar_store::{ReviewStore, Settings, SettingsStore};
use reviewbar_fetch::SessionStore;
use tracing::{debug, info};

// ============================================================================
// Badge Sink
// ============================================================================

/// Where the aggregate count is rendered.
///
/// `render(None)` clears the badge; `render(Some(text))` shows the
/// decimal total.
pub trait BadgeSink: Send + Sync {
    /// Publishes the badge text.
    fn render(&self, text: Option<&str>);
}

/// Badge sink for watch mode: one line per publish.
pub struct TerminalBadge;

impl BadgeSink for TerminalBadge {
    fn render(&self, text: Option<&str>) {
        match text {
            Some(text) => println!("badge: {text}"),
            None => println!("badge: (cleared)"),
        }
    }
}

/// Badge sink for one-shot commands: log only, the command prints its own
/// summary.
pub struct LogBadge;

impl BadgeSink for LogBadge {
    fn render(&self, text: Option<&str>) {
        debug!(badge = text.unwrap_or("(cleared)"), "Badge rendered");
    }
}

// ============================================================================
// Update Engine
// ============================================================================

/// Runs update cycles against the configured providers.
pub struct UpdateEngine {
    store: ReviewStore,
    settings: SettingsStore,
    checks: Vec<Box<dyn ReviewCheck>>,
    badge: Box<dyn BadgeSink>,
    session: SessionStore,
}

impl UpdateEngine {
    /// Creates an engine over the given checks and badge sink.
    pub fn new(
        store: ReviewStore,
        settings: SettingsStore,
        checks: Vec<Box<dyn ReviewCheck>>,
        badge: Box<dyn BadgeSink>,
    ) -> Self {
        Self {
            store,
            settings,
            checks,
            badge,
            session: SessionStore::discover(),
        }
    }

    /// Replaces the browser session probe (used to pin the browser set).
    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = session;
        self
    }

    /// The review store this engine writes to.
    pub fn store(&self) -> &ReviewStore {
        &self.store
    }

    /// Builds the per-cycle check context from a settings snapshot.
    ///
    /// Settings are read once per cycle, so a credential edit mid-cycle
    /// takes effect on the next cycle (which the config reactor triggers
    /// immediately anyway).
    fn context(&self, settings: &Settings) -> CheckContext {
        CheckContext::new(Credentials {
            bugzilla_api_key: settings.bugzilla_api_key.clone(),
        })
        .with_session(self.session.clone())
    }

    /// Runs one full update cycle and returns the aggregate total.
    ///
    /// Triggers arriving while a cycle is in flight are coalesced: the
    /// call returns the current total without starting a second cycle.
    /// The badge is republished only when a cycle completes, so the
    /// previously published total stays visible throughout.
    pub async fn run_cycle(&self) -> u64 {
        if self.store.begin_cycle().await.is_err() {
            debug!("Cycle already in flight, dropping trigger");
            return self.store.snapshot().await.total();
        }

        let settings = self.settings.settings().await;
        let ctx = self.context(&settings);

        let enabled: Vec<&dyn ReviewCheck> = self
            .checks
            .iter()
            .map(|check| &**check)
            .filter(|check| settings.is_enabled(check.kind()))
            .collect();
        debug!(providers = enabled.len(), "Cycle started");

        // The cycle completes only once every check has settled.
        let results = join_all(enabled.iter().map(|check| check.check(&ctx))).await;

        for result in results {
            match result.outcome {
                Ok(count) => self.store.set_count(result.provider, count).await,
                Err(error) => {
                    // Stale-but-valid: the provider's previous count stays.
                    self.store
                        .set_error(result.provider, error.to_string())
                        .await;
                }
            }
        }

        self.store.end_cycle().await;

        let snapshot = self.store.snapshot().await;
        let total = snapshot.total();
        self.badge.render(snapshot.badge_text().as_deref());
        info!(total, "Cycle complete");
        total
    }
}

// ============================================================================
// Tests
// ============================================================================
