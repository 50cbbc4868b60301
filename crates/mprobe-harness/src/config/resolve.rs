//! Config resolution for mprobe.
//!
//! Resolves [`HarnessConfig`] from multiple sources with the following
//! priority (highest to lowest):
//!
//! 1. CLI flags (applied by the caller after [`resolve_config`] returns)
//! 2. Environment variables (`MPROBE_*`)
//! 3. `mprobe.toml` (explicit `--config` path, or the current directory)
//! 4. Compiled-in defaults (via [`HarnessConfig::default`])

use std::path::Path;

use anyhow::Context;

use super::types::HarnessConfig;

/// Resolve the harness configuration.
///
/// # Arguments
///
/// * `config_path` – Optional explicit path to `mprobe.toml`. When `None`,
///   `mprobe.toml` in the current directory is used if present.
///
/// # Errors
///
/// Returns an error if an explicit `config_path` cannot be read, or if a
/// config file exists but is not valid TOML.
pub fn resolve_config(config_path: Option<&Path>) -> anyhow::Result<HarnessConfig> {
    let mut config = match config_path {
        Some(path) => load_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let implicit = Path::new("mprobe.toml");
            if implicit.exists() {
                load_file(implicit).context("failed to load ./mprobe.toml")?
            } else {
                HarnessConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn load_file(path: &Path) -> anyhow::Result<HarnessConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

/// Apply `MPROBE_*` environment variable overrides.
///
/// Empty string values are treated as "not set" and do not override the
/// file or defaults.
fn apply_env_overrides(cfg: &mut HarnessConfig) {
    if let Ok(v) = std::env::var("MPROBE_SERVER_BIN") {
        if !v.is_empty() {
            cfg.server_bin = v;
        }
    }
    if let Ok(v) = std::env::var("MPROBE_DATA_SOURCE") {
        if !v.is_empty() {
            cfg.data_source = v;
        }
    }
    if let Ok(v) = std::env::var("MPROBE_PROTOCOL_VERSION") {
        if !v.is_empty() {
            cfg.protocol_version = v;
        }
    }
}
