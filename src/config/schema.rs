//! Data types representing vizreg configuration.

use serde::{Deserialize, Serialize};

/// Comparison service used when the config file does not name one.
pub const DEFAULT_ENDPOINT: &str = "https://vizreg.io";

/// Top-level configuration loaded from `.vizreg.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key for the comparison service.
    #[serde(default)]
    pub api_key: String,

    /// API secret for the comparison service.
    #[serde(default)]
    pub api_secret: String,

    /// Base URL of the comparison service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Optional project name, forwarded with uploads so one account can
    /// hold reports for several repositories.
    #[serde(default)]
    pub project: Option<String>,

    /// Render command configuration.
    pub render: RenderConfig,
}

/// The command that renders component snapshots.
///
/// One-shot invocations run `command args...` and read a single JSON
/// manifest from stdout. Dev mode appends `watch_args` and reads one
/// manifest line per completed render pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Executable to run.
    pub command: String,

    /// Arguments for a one-shot render.
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra arguments appended in dev (watch) mode.
    #[serde(default = "default_watch_args")]
    pub watch_args: Vec<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_watch_args() -> Vec<String> {
    vec!["--watch".to_string()]
}

impl Config {
    /// Returns true when both credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}
