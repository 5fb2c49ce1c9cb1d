//! Watch command - the badge daemon.
//!
//! Runs an initial cycle, then keeps the badge current: the scheduler
//! fires cycles at the configured interval, the config reactor responds
//! to settings changes (including external edits picked up by the file
//! watcher), and the query channel serves snapshot reads. Runs until
//! interrupted.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use reviewbar_providers::ProviderRegistry;
use reviewbar_store::{ReviewStore, SettingsStore};

use crate::engine::{query, ConfigReactor, Scheduler, TerminalBadge, UpdateEngine};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Override the configured polling interval, in minutes.
    #[arg(long, short)]
    pub interval: Option<u64>,
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs) -> Result<()> {
    let settings = SettingsStore::load_default().await;
    if let Some(minutes) = args.interval {
        settings.set_update_interval(minutes).await?;
    }

    let store = ReviewStore::new();
    let engine = Arc::new(UpdateEngine::new(
        store.clone(),
        settings.clone(),
        ProviderRegistry::checks(),
        Box::new(TerminalBadge),
    ));

    // Message-channel read path: the popup-equivalent surface.
    let (queries, _query_task) = query::spawn(store.clone());

    // Re-print the per-provider summary whenever a cycle commits.
    let mut store_rx = store.subscribe();
    let display_store = store.clone();
    tokio::spawn(async move {
        while store_rx.changed().await.is_ok() {
            if display_store.cycle_in_flight().await {
                continue;
            }
            if let Some(snapshot) = queries.get_reviews().await {
                let line: Vec<String> = snapshot
                    .iter()
                    .map(|(kind, count)| format!("{}: {}", kind.cli_name(), count))
                    .collect();
                println!("{}  total: {}", line.join("  "), snapshot.total());
            }
        }
    });

    // First cycle right away, then one per interval.
    engine.run_cycle().await;

    let mut scheduler = Scheduler::new(Arc::clone(&engine));
    scheduler.schedule(settings.settings().await.update_interval());
    let scheduler = Arc::new(Mutex::new(scheduler));

    let _reactor = ConfigReactor::spawn(
        settings.subscribe(),
        Arc::clone(&scheduler),
        Arc::clone(&engine),
    );

    // Keep the watcher alive for the lifetime of the daemon.
    let _watcher = settings.spawn_watcher()?;

    info!("Watching for pending reviews; Ctrl-C to exit");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
