//! Configuration for capture and snapshot retention

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Block capture settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Written into the meta block of every stream
    pub format_version: String,

    /// Cap on pattern-detected next actions (the open-question action is extra)
    pub max_next_actions: usize,

    /// Chars of the trailing user question quoted in its next action
    pub question_excerpt_chars: usize,

    /// Hex chars kept from the digest of each code block
    pub code_hash_len: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            format_version: "1.0".to_string(),
            max_next_actions: 5,
            question_excerpt_chars: 100,
            code_hash_len: 8,
        }
    }
}

/// Retention settings for one snapshot list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum retained snapshots (oldest by insertion are evicted)
    pub capacity: usize,

    /// Name of the list value in the persistence backend
    pub storage_key: String,

    /// Hex chars kept from the content digest
    pub content_hash_len: usize,

    /// Skip creating a new version when content matches the chain head
    pub dedupe_identical: bool,
}

impl StoreConfig {
    /// Raw and compressed conversation snapshots
    pub fn snapshots() -> Self {
        Self {
            capacity: 20,
            storage_key: "snapshots".to_string(),
            content_hash_len: 16,
            dedupe_identical: false,
        }
    }

    /// Verbatim block-stream history
    pub fn verbatim_history() -> Self {
        Self {
            capacity: 50,
            storage_key: "verbatim_history".to_string(),
            ..Self::snapshots()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::snapshots()
    }
}

/// Top-level configuration, stored as JSON in the data directory
///
/// Missing store fields are filled from [`StoreConfig::snapshots`], so a
/// partial `verbatim_history` section should set its own `storage_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub snapshots: StoreConfig,
    pub verbatim_history: StoreConfig,
}

impl Config {
    pub fn new() -> Self {
        Self {
            capture: CaptureConfig::default(),
            snapshots: StoreConfig::snapshots(),
            verbatim_history: StoreConfig::verbatim_history(),
        }
    }

    /// Load from `path`, or defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Both store capacities must be at least 1
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snapshots.capacity == 0 {
            return Err(ConfigError::ZeroCapacity("snapshots"));
        }
        if self.verbatim_history.capacity == 0 {
            return Err(ConfigError::ZeroCapacity("verbatim_history"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
