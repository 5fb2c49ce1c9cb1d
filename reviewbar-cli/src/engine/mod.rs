//! The update engine.
//!
//! Everything that decides *when* state changes lives here:
//!
//! - [`orchestrator::UpdateEngine`] runs one full cycle: every enabled
//!   provider check, results merged into the review store, badge
//!   re-rendered.
//! - [`scheduler::Scheduler`] fires cycles on the configured period.
//! - [`reactor::ConfigReactor`] reacts to settings changes by
//!   rescheduling the timer or triggering an immediate cycle.
//! - [`query`] serves the message channel: snapshot reads that never
//!   start a cycle and never wait on the network.

pub mod orchestrator;
pub mod query;
pub mod reactor;
pub mod scheduler;

pub use orchestrator::{BadgeSink, LogBadge, TerminalBadge, UpdateEngine};
pub use reactor::ConfigReactor;
pub use scheduler::Scheduler;

// ============================================================================
// Test Support
// ============================================================================
