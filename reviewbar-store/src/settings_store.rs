//! User preferences store.
//!
//! Manages user settings with persistence and change notification. The
//! update engine treats settings as read-only input: mutation happens
//! through the typed setters here (the CLI's `config` surface), and every
//! committed change is published on a watch channel the config reactor
//! subscribes to. External edits to the settings file are picked up by a
//! file watcher.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use reviewbar_core::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json_or_default, save_json};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minutes between scheduled update cycles. Always at least one.
    pub update_interval_minutes: u64,

    /// Providers included in update cycles.
    pub enabled_providers: HashSet<ProviderKind>,

    /// Bugzilla API key. The Phabricator session is ambient (browser
    /// cookie) and never stored here.
    pub bugzilla_api_key: Option<String>,

    /// Log level.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            update_interval_minutes: 5,
            enabled_providers: ProviderKind::all().iter().copied().collect(),
            bugzilla_api_key: None,
            log_level: LogLevel::Info,
        }
    }
}

impl Settings {
    /// The polling period as a duration.
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_minutes.max(1) * 60)
    }

    /// Whether a provider takes part in update cycles.
    pub fn is_enabled(&self, kind: ProviderKind) -> bool {
        self.enabled_providers.contains(&kind)
    }
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational and above.
    #[default]
    Info,
    /// Debug and above.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// The `EnvFilter` directive for this level.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persisted user settings with change notification.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<Settings>,
}

impl SettingsStore {
    /// Loads settings from the default path, falling back to defaults on
    /// a missing file.
    pub async fn load_default() -> Self {
        Self::load_from(default_settings_path()).await
    }

    /// Loads settings from a specific path.
    pub async fn load_from(path: PathBuf) -> Self {
        let settings: Settings = load_json_or_default(&path).await;
        info!(path = %path.display(), "Settings loaded");

        let (notify, _) = watch::channel(settings.clone());
        Self {
            inner: Arc::new(RwLock::new(settings)),
            path,
            notify,
        }
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current settings.
    pub async fn settings(&self) -> Settings {
        self.inner.read().await.clone()
    }

    /// Subscribes to settings changes. The receiver always holds the most
    /// recently committed settings.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.notify.subscribe()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Applies a mutation, persists, and notifies subscribers.
    ///
    /// A mutation that leaves the settings unchanged is a no-op: nothing
    /// is written and no change event fires.
    pub async fn update<F>(&self, mutate: F) -> Result<Settings, StoreError>
    where
        F: FnOnce(&mut Settings),
    {
        let updated = {
            let mut inner = self.inner.write().await;
            let mut next = inner.clone();
            mutate(&mut next);
            if next == *inner {
                return Ok(next);
            }
            *inner = next.clone();
            next
        };

        save_json(&self.path, &updated).await?;
        self.notify.send_replace(updated.clone());
        debug!("Settings updated and persisted");
        Ok(updated)
    }

    /// Sets the polling interval in minutes. Zero is rejected.
    pub async fn set_update_interval(&self, minutes: u64) -> Result<Settings, StoreError> {
        if minutes == 0 {
            return Err(StoreError::InvalidValue(
                "update interval must be at least one minute".to_string(),
            ));
        }
        self.update(|s| s.update_interval_minutes = minutes).await
    }

    /// Sets or clears the Bugzilla API key.
    pub async fn set_bugzilla_api_key(
        &self,
        key: Option<String>,
    ) -> Result<Settings, StoreError> {
        self.update(|s| s.bugzilla_api_key = key.filter(|k| !k.is_empty()))
            .await
    }

    /// Enables or disables a provider.
    pub async fn set_provider_enabled(
        &self,
        kind: ProviderKind,
        enabled: bool,
    ) -> Result<Settings, StoreError> {
        self.update(|s| {
            if enabled {
                s.enabled_providers.insert(kind);
            } else {
                s.enabled_providers.remove(&kind);
            }
        })
        .await
    }

    // ========================================================================
    // External Edits
    // ========================================================================

    /// Re-reads the settings file and publishes the new value if it
    /// differs from the in-memory state.
    pub async fn reload(&self) {
        let fresh: Settings = load_json_or_default(&self.path).await;
        let changed = {
            let mut inner = self.inner.write().await;
            if fresh == *inner {
                false
            } else {
                *inner = fresh.clone();
                true
            }
        };

        if changed {
            info!(path = %self.path.display(), "Settings reloaded from disk");
            self.notify.send_replace(fresh);
        }
    }

    /// Watches the settings file for external edits, reloading on change.
    ///
    /// The parent directory is watched rather than the file itself: saves
    /// go through a rename, which would detach a file-level watch. The
    /// returned watcher must be kept alive for the watch to stay active.
    pub fn spawn_watcher(&self) -> Result<RecommendedWatcher, StoreError> {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res| match res {
            Ok(_) => {
                let _ = tx.send(());
            }
            Err(e) => warn!(error = %e, "Settings watcher error"),
        })
        .map_err(|e| StoreError::Watch(e.to_string()))?;

        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| StoreError::Watch(e.to_string()))?;

        let store = self.clone();
        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                // Collapse event bursts from a single save.
                while rx.try_recv().is_ok() {}
                store.reload().await;
            }
        });

        debug!(dir = %dir.display(), "Settings watcher started");
        Ok(watcher)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load_from(dir.path().join("settings.json")).await;
        (dir, store)
    }

    #[tokio::test]
    async fn test_defaults() {
        let (_dir, store) = temp_store().await;
        let settings = store.settings().await;

        assert_eq!(settings.update_interval_minutes, 5);
        assert_eq!(settings.update_interval(), Duration::from_secs(300));
        assert!(settings.is_enabled(ProviderKind::Phabricator));
        assert!(settings.is_enabled(ProviderKind::Bugzilla));
        assert!(settings.bugzilla_api_key.is_none());
    }

    #[tokio::test]
    async fn test_update_persists_and_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::load_from(path.clone()).await;
        store.set_update_interval(15).await.unwrap();
        store
            .set_bugzilla_api_key(Some("key123".to_string()))
            .await
            .unwrap();

        let reopened = SettingsStore::load_from(path).await;
        let settings = reopened.settings().await;
        assert_eq!(settings.update_interval_minutes, 15);
        assert_eq!(settings.bugzilla_api_key.as_deref(), Some("key123"));
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let (_dir, store) = temp_store().await;
        assert!(matches!(
            store.set_update_interval(0).await,
            Err(StoreError::InvalidValue(_))
        ));
        assert_eq!(store.settings().await.update_interval_minutes, 5);
    }

    #[tokio::test]
    async fn test_empty_key_clears() {
        let (_dir, store) = temp_store().await;
        store
            .set_bugzilla_api_key(Some("key".to_string()))
            .await
            .unwrap();
        store
            .set_bugzilla_api_key(Some(String::new()))
            .await
            .unwrap();
        assert!(store.settings().await.bugzilla_api_key.is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let (_dir, store) = temp_store().await;
        let mut rx = store.subscribe();

        store.set_update_interval(2).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().update_interval_minutes, 2);
    }

    #[tokio::test]
    async fn test_noop_update_does_not_notify() {
        let (_dir, store) = temp_store().await;
        let mut rx = store.subscribe();

        store.set_update_interval(5).await.unwrap(); // already 5
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_provider_toggle() {
        let (_dir, store) = temp_store().await;

        store
            .set_provider_enabled(ProviderKind::Bugzilla, false)
            .await
            .unwrap();
        assert!(!store.settings().await.is_enabled(ProviderKind::Bugzilla));

        store
            .set_provider_enabled(ProviderKind::Bugzilla, true)
            .await
            .unwrap();
        assert!(store.settings().await.is_enabled(ProviderKind::Bugzilla));
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::load_from(path.clone()).await;
        let mut rx = store.subscribe();

        // Simulate another process rewriting the file.
        let external = Settings {
            update_interval_minutes: 30,
            ..Settings::default()
        };
        save_json(&path, &external).await.unwrap();

        store.reload().await;
        rx.changed().await.unwrap();
        assert_eq!(store.settings().await.update_interval_minutes, 30);
    }
}
