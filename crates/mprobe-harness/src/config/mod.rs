//! Configuration resolution for the mprobe binary.
//!
//! The entry point is [`resolve_config`], which layers `mprobe.toml`,
//! `MPROBE_*` environment variables, and compiled-in defaults. CLI flag
//! overrides are applied by the command modules after resolution.

mod resolve;
mod types;

pub use resolve::resolve_config;
pub use types::HarnessConfig;
