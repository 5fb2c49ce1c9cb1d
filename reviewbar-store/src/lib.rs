// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # ReviewBar Store
//!
//! State management for the ReviewBar application.
//!
//! This crate provides:
//!
//! - **[`ReviewStore`]**: the aggregate pending-review state, observable
//!   via a watch channel, with a cycle guard serializing writers
//! - **[`SettingsStore`]**: user preferences with persistence, change
//!   notification, and a file watcher for external edits
//! - **[`persistence`]**: JSON file I/O with restrictive permissions
//!
//! ## Usage
//!
//! ```ignore
//! use reviewbar_store::{ReviewStore, SettingsStore};
//! use reviewbar_core::ProviderKind;
//!
//! let reviews = ReviewStore::new();
//! let settings = SettingsStore::load_default().await?;
//!
//! reviews.set_count(ProviderKind::Bugzilla, 3).await;
//!
//! let mut rx = reviews.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("total: {}", reviews.snapshot().await.total());
//! }
//! ```

pub mod error;
pub mod persistence;
pub mod review_store;
pub mod settings_store;

pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use review_store::ReviewStore;
pub use settings_store::{LogLevel, Settings, SettingsStore};
