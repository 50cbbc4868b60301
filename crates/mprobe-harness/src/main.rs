//! mprobe — scenario harness for analytics MCP servers.
//!
//! # Subcommands
//!
//! - `run`       — Run scenarios against the target server
//! - `scenarios` — List the built-in scenario catalog
//! - `config`    — Show resolved configuration

use clap::Parser;
use mprobe_core::logging;

use mprobe_harness::cli::{Cli, Commands};
use mprobe_harness::commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::run(&cli.config, args).await,
        Commands::Scenarios(args) => commands::scenarios::run(&cli.config, args).await,
        Commands::Config(args) => commands::config_cmd::run(&cli.config, args).await,
    }
}
