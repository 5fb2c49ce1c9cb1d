//! Providers command - list providers and their configuration state.

use anyhow::Result;
use reviewbar_providers::{CheckContext, Credentials, ProviderRegistry};
use reviewbar_store::SettingsStore;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the providers command.
pub async fn run(cli: &Cli) -> Result<()> {
    let settings = SettingsStore::load_default().await.settings().await;
    let ctx = CheckContext::new(Credentials {
        bugzilla_api_key: settings.bugzilla_api_key.clone(),
    });

    let rows: Vec<_> = ProviderRegistry::checks()
        .iter()
        .map(|check| {
            (
                check.kind(),
                settings.is_enabled(check.kind()),
                check.is_configured(&ctx),
                check.endpoint(),
            )
        })
        .collect();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("Providers");
            for (kind, enabled, configured, endpoint) in &rows {
                println!(
                    "{}",
                    formatter.format_provider(*kind, *enabled, *configured, endpoint)
                );
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_providers(&rows)?);
        }
    }

    Ok(())
}
