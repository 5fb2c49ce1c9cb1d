//! Cycle scheduler.
//!
//! Clearing an absent timer is not an error, and a newly created timer
//! fires a full period from now, not immediately. Rescheduling therefore
//! resets the phase.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::engine::orchestrator::UpdateEngine;

/// Fires update cycles on a fixed period.
pub struct Scheduler {
    engine: Arc<UpdateEngine>,
    task: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Creates an unarmed scheduler.
    pub fn new(engine: Arc<UpdateEngine>) -> Self {
        Self { engine, task: None }
    }

    /// Cancels the pending schedule. Returns whether one existed;
    /// clearing an unarmed scheduler is a no-op.
    pub fn clear(&mut self) -> bool {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Scheduler cleared");
            true
        } else {
            false
        }
    }

    /// (Re)schedules cycles every `period`, with the first fire one full
    /// period from now.
    pub fn schedule(&mut self, period: Duration) {
        self.clear();

        info!(period_secs = period.as_secs(), "Scheduler armed");
        let engine = Arc::clone(&self.engine);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                debug!("Timer fired");
                // Cycles run detached: clearing the schedule mid-cycle must
                // not cancel the cycle, or the store's guard would stay
                // claimed forever. Overlap is handled by coalescing.
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    engine.run_cycle().await;
                });
            }
        }));
    }

    /// Whether a schedule is currently armed.
    #[allow(dead_code)]
    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================
