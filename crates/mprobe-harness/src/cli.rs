//! CLI argument types for mprobe.
//!
//! Defines the top-level [`Cli`] struct and all subcommand [`Args`] using
//! clap's derive macros. Each subcommand maps to a module in [`crate::commands`].

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scenario harness for analytics MCP servers speaking line-delimited JSON-RPC
#[derive(Parser, Debug)]
#[command(name = "mprobe", version, about)]
pub struct Cli {
    /// Path to mprobe.toml config file (default: ./mprobe.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the target server
    Run(RunArgs),
    /// List the built-in scenario catalog
    Scenarios(ScenariosArgs),
    /// Show resolved configuration
    Config(ConfigArgs),
}

/// Arguments for the `run` subcommand
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario names to run (default: the full catalog)
    pub scenarios: Vec<String>,

    /// Server executable override (overrides config/env)
    #[arg(long)]
    pub server_bin: Option<String>,

    /// Data source override
    #[arg(long)]
    pub data_source: Option<String>,
}

/// Arguments for the `scenarios` subcommand
#[derive(Args, Debug)]
pub struct ScenariosArgs {}

/// Arguments for the `config` subcommand
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
