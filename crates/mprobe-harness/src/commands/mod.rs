//! Subcommand implementations for the mprobe binary.

pub mod config_cmd;
pub mod run;
pub mod scenarios;
