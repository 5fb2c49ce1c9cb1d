//! Check command - run one update cycle and print the snapshot.

use anyhow::Result;
use reviewbar_providers::ProviderRegistry;
use reviewbar_store::{ReviewStore, SettingsStore};

use crate::engine::{LogBadge, UpdateEngine};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the check command.
///
/// A provider failure is not a command failure: the snapshot simply shows
/// the provider as stale (with its count from before the failure, zero on
/// a first-ever run) and the details go to the log.
pub async fn run(cli: &Cli) -> Result<()> {
    let settings = SettingsStore::load_default().await;

    let engine = UpdateEngine::new(
        ReviewStore::new(),
        settings,
        ProviderRegistry::checks(),
        Box::new(LogBadge),
    );
    engine.run_cycle().await;

    let store = engine.store();
    let snapshot = store.snapshot().await;
    let errors = store.all_errors().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            print!(
                "{}",
                formatter.format_snapshot(&snapshot, &errors, store.last_cycle().await)
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_snapshot(&snapshot, &errors)?);
        }
    }

    Ok(())
}
