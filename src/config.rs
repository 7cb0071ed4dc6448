use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const CONFIG_FILE_NAME: &str = "engine.toml";

/// Engine-wide tunables, mirroring the constants named in the facade's
/// contract: teleport probability, convergence threshold, retry budget,
/// page cap, rounding precision for result ordering, and the default
/// top-k for search.
///
/// `damping_factor` is the teleport probability `alpha` from §4.G, not the
/// classic `1 - alpha` "damping" some PageRank writeups use; the field keeps
/// the familiar name since it's what callers expect to tune.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub damping_factor: f64,
    pub convergence_epsilon: f64,
    pub max_retries: u32,
    pub page_cap: usize,
    pub score_precision: usize,
    pub default_top_k: usize,
    pub concurrency: usize,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl EngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Loads config from `path`, falling back to defaults if it doesn't exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| EngineError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Writes this config to `path` as pretty-printed TOML, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.1,
            convergence_epsilon: 1e-4,
            max_retries: 3,
            page_cap: 10_000,
            score_precision: 3,
            default_top_k: 10,
            concurrency: 10,
            user_agent: "keyword-search-engine/0.1".to_string(),
            request_timeout_secs: 30,
        }
    }
}
