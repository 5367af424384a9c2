//! TOML configuration for the command-line front end
//!
//! ```toml
//! [engine]
//! preview_chars = 60
//!
//! [output]
//! format = "html"
//! html_scope = "contract"
//! ```
//!
//! Every table and key is optional; command-line flags win over file values.

use anyhow::Context;
use highlight_engine::{EngineConfig, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (default: console)
    #[serde(default)]
    pub format: OutputFormat,
    /// Fixed HTML id/class suffix; random per run when unset
    pub html_scope: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }
}
