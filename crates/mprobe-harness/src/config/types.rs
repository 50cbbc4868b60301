//! Configuration types for the mprobe harness.

use serde::{Deserialize, Serialize};

/// Resolved harness configuration.
///
/// Deserialized from `mprobe.toml`. Every field has a default, so an
/// absent or minimal file produces a fully functional configuration.
///
/// # Example `mprobe.toml`
///
/// ```toml
/// server_bin = "./target/debug/rezolus"
/// server_args = ["mcp"]
/// data_source = "kdfw.parquet"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Path to the analytics server executable (default: `"rezolus"` from `PATH`).
    #[serde(default = "default_server_bin")]
    pub server_bin: String,

    /// Arguments selecting the server's protocol-serving mode (default: `["mcp"]`).
    #[serde(default = "default_server_args")]
    pub server_args: Vec<String>,

    /// Data source handed to every tool call (default: `"kdfw.parquet"`).
    #[serde(default = "default_data_source")]
    pub data_source: String,

    /// Protocol version string sent in the handshake (default: `"2025-06-18"`).
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,

    /// Client name sent in the handshake.
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Client version sent in the handshake.
    #[serde(default = "default_client_version")]
    pub client_version: String,
}

fn default_server_bin() -> String {
    "rezolus".to_string()
}

fn default_server_args() -> Vec<String> {
    vec!["mcp".to_string()]
}

fn default_data_source() -> String {
    "kdfw.parquet".to_string()
}

fn default_protocol_version() -> String {
    "2025-06-18".to_string()
}

fn default_client_name() -> String {
    "metric-probe".to_string()
}

fn default_client_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            server_bin: default_server_bin(),
            server_args: default_server_args(),
            data_source: default_data_source(),
            protocol_version: default_protocol_version(),
            client_name: default_client_name(),
            client_version: default_client_version(),
        }
    }
}
