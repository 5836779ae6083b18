// File: src/config.rs
// Purpose: Router configuration, optionally loaded from a TOML file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Maximum redirect hops before a resolution fails.
///
/// Any small fixed bound works; what matters is that redirect cycles
/// terminate deterministically.
pub const DEFAULT_MAX_REDIRECTS: usize = 20;

/// Router configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Prefix stripped from inbound paths before matching (e.g. "/app").
    /// Redirect targets are app-internal and are matched as-is.
    #[serde(default)]
    pub prefix: String,

    /// Maximum redirect depth before resolution fails.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl RouterConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }
}
