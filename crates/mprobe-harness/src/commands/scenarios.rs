//! `scenarios` subcommand — list the built-in catalog.

use crate::cli::ScenariosArgs;
use crate::config::resolve_config;
use crate::scenario::catalog;
use std::path::PathBuf;

/// Run the `scenarios` subcommand.
///
/// # Errors
///
/// Returns an error if configuration resolution fails.
pub async fn run(config_path: &Option<PathBuf>, _args: ScenariosArgs) -> anyhow::Result<()> {
    let config = resolve_config(config_path.as_deref())?;
    for scenario in catalog(&config) {
        println!(
            "{:<16} {} ({} steps)",
            scenario.name,
            scenario.summary,
            scenario.steps.len()
        );
    }
    Ok(())
}
