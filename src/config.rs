use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::analysis::engagement::EngagementWeights;
use crate::error::{ListeningError, Result};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Reject the whole batch when any row is excluded
    pub strict: bool,
    /// In strict mode, also reject on informational (coerced) errors
    pub fail_on_coerced: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub comment_weight: u64,
    pub share_weight: u64,
    pub reach_multiplier: u64,
    /// How many top posts and hashtags the report lists
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let w = EngagementWeights::default();
        Self {
            comment_weight: w.comment_weight,
            share_weight: w.share_weight,
            reach_multiplier: w.reach_multiplier,
            top_n: 5,
        }
    }
}

impl ReportConfig {
    pub fn weights(&self) -> EngagementWeights {
        EngagementWeights {
            comment_weight: self.comment_weight,
            share_weight: self.share_weight,
            reach_multiplier: self.reach_multiplier,
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH), true)
    }

    /// Load an explicitly-named config file; missing file is an error here.
    pub fn load_path(path: &Path) -> Result<Self> {
        Self::load_from(path, false)
    }

    fn load_from(path: &Path, missing_ok: bool) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && missing_ok => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ListeningError::Config(format!(
                    "failed to read config file '{}': {}",
                    path.display(),
                    e
                )))
            }
        };
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
