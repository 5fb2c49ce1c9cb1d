//! Config command - read and mutate persisted settings.
//!
//! This is the configuration store's write surface. A running `watch`
//! daemon picks the change up through its settings file watcher, so an
//! edit here is reflected there without a restart.

use anyhow::{anyhow, Result};
use clap::Subcommand;
use reviewbar_core::ProviderKind;
use reviewbar_store::SettingsStore;

/// Settings subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the current settings.
    Show,
    /// Set the polling interval in minutes.
    SetInterval {
        /// Minutes between update cycles (at least 1).
        minutes: u64,
    },
    /// Set the Bugzilla API key.
    SetBugzillaKey {
        /// The API key.
        key: String,
    },
    /// Clear the Bugzilla API key.
    ClearBugzillaKey,
    /// Enable a provider.
    Enable {
        /// Provider name (phabricator, bugzilla).
        provider: String,
    },
    /// Disable a provider.
    Disable {
        /// Provider name (phabricator, bugzilla).
        provider: String,
    },
}

fn parse_provider(name: &str) -> Result<ProviderKind> {
    ProviderKind::from_cli_name(name).ok_or_else(|| anyhow!("Unknown provider: {name}"))
}

/// Runs the config command.
pub async fn run(command: &ConfigCommand) -> Result<()> {
    let store = SettingsStore::load_default().await;

    match command {
        ConfigCommand::Show => {
            let settings = store.settings().await;
            println!("Settings file: {}", store.path().display());
            println!("  update interval: {} min", settings.update_interval_minutes);
            println!(
                "  bugzilla key:    {}",
                if settings.bugzilla_api_key.is_some() {
                    "(set)"
                } else {
                    "(not set)"
                }
            );
            for kind in ProviderKind::all() {
                println!(
                    "  {:<16} {}",
                    format!("{}:", kind.cli_name()),
                    if settings.is_enabled(*kind) {
                        "enabled"
                    } else {
                        "disabled"
                    }
                );
            }
        }
        ConfigCommand::SetInterval { minutes } => {
            store.set_update_interval(*minutes).await?;
            println!("Update interval set to {minutes} min");
        }
        ConfigCommand::SetBugzillaKey { key } => {
            store.set_bugzilla_api_key(Some(key.clone())).await?;
            println!("Bugzilla API key saved");
        }
        ConfigCommand::ClearBugzillaKey => {
            store.set_bugzilla_api_key(None).await?;
            println!("Bugzilla API key cleared");
        }
        ConfigCommand::Enable { provider } => {
            let kind = parse_provider(provider)?;
            store.set_provider_enabled(kind, true).await?;
            println!("{} enabled", kind.display_name());
        }
        ConfigCommand::Disable { provider } => {
            let kind = parse_provider(provider)?;
            store.set_provider_enabled(kind, false).await?;
            println!("{} disabled", kind.display_name());
        }
    }

    Ok(())
}
