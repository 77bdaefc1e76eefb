//! Engine configuration.
//!
//! Values come from, lowest precedence first: built-in defaults, a JSON
//! config file, `RULEKIT_*` environment variables, command-line flags.

use crate::engine::scheduler::resolve_parallelism;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Overrides [`EngineConfig::parallelism`].
pub const PARALLELISM_ENV: &str = "RULEKIT_PARALLELISM";
/// Overrides [`EngineConfig::log_filter`].
pub const LOG_ENV: &str = "RULEKIT_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum concurrent rule handlers per check call; zero or less means
    /// one per logical CPU
    pub parallelism: i64,
    /// Let clients memoize rule and category listings
    pub cache_rules_and_categories: bool,
    /// `tracing` env-filter directive for the binary
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            parallelism: 0,
            cache_rules_and_categories: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `RULEKIT_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(PARALLELISM_ENV) {
            self.parallelism = value.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be an integer, got {:?}", PARALLELISM_ENV, value))
            })?;
        }
        if let Some(value) = lookup(LOG_ENV) {
            if !value.is_empty() {
                self.log_filter = value;
            }
        }
        Ok(self)
    }

    /// Concrete worker count; values below one mean one per logical CPU.
    pub fn resolved_parallelism(&self) -> usize {
        resolve_parallelism(self.parallelism)
    }
}
