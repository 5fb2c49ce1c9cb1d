// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ReviewBar` Core
//!
//! Core types, models, and errors for the `ReviewBar` application.
//!
//! This crate provides the foundational abstractions used across all other
//! `ReviewBar` crates:
//!
//! - [`ProviderKind`] - Enum of the supported review providers
//! - [`ReviewCounts`] - Per-provider pending-review counts and the badge rule
//! - [`ProviderResult`] - Outcome of a single provider check
//! - [`CheckError`] - Failure classification for provider checks

pub mod error;
pub mod models;

// Re-export error types
pub use error::CheckError;

// Re-export all model types
pub use models::{ProviderKind, ProviderResult, ReviewCounts};
