//! `run` subcommand — drive scenarios against the target server.
//!
//! Resolves configuration, selects scenarios, runs each against its own
//! fresh session, prints the rollup report on stdout, and exits non-zero
//! when any step failed. Every session is terminated and waited on before
//! the report is printed, whatever the scenario outcomes were.

use crate::cli::RunArgs;
use crate::config::resolve_config;
use crate::report::RunReport;
use crate::scenario::{catalog, run_scenario};
use std::path::PathBuf;

/// Run the `run` subcommand.
///
/// # Errors
///
/// Returns an error if configuration resolution fails, a named scenario
/// does not exist, the server cannot be launched, or any step failed.
pub async fn run(config_path: &Option<PathBuf>, args: RunArgs) -> anyhow::Result<()> {
    let mut config = resolve_config(config_path.as_deref())?;

    // Apply CLI argument overrides
    if let Some(ref server_bin) = args.server_bin {
        config.server_bin = server_bin.clone();
    }
    if let Some(ref data_source) = args.data_source {
        config.data_source = data_source.clone();
    }

    let all = catalog(&config);
    let selected: Vec<_> = if args.scenarios.is_empty() {
        all
    } else {
        let mut picked = Vec::new();
        for name in &args.scenarios {
            let scenario = all
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| anyhow::anyhow!("unknown scenario `{name}`; see `mprobe scenarios`"))?;
            picked.push(scenario.clone());
        }
        picked
    };

    let mut report = RunReport::new();
    for scenario in &selected {
        tracing::info!(scenario = scenario.name, "running");
        // A launch failure is the one fatal condition; it aborts the run.
        let scenario_report = run_scenario(&config, scenario).await?;
        report.record(scenario_report);
    }

    print!("{}", report.render());

    let failed = report.failed_steps();
    if failed > 0 {
        anyhow::bail!("{failed} of {} steps failed", report.total_steps());
    }
    Ok(())
}
