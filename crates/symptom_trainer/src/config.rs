//! Trainer configuration
//!
//! Defaults mirror the fixed relative paths the predictor expects; a TOML
//! file may override any subset, and CLI flags are applied last by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use symptom_core::ArtifactPaths;
use tracing::info;

use crate::dataset::DEFAULT_OUTCOME_COLUMN;
use crate::errors::TrainerError;
use crate::trainer::ForestConfig;

/// Default training dataset location
pub const DEFAULT_DATASET_PATH: &str = "Training.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub dataset_path: PathBuf,
    pub outcome_column: String,
    pub artifacts: ArtifactPaths,
    pub forest: ForestConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            outcome_column: DEFAULT_OUTCOME_COLUMN.to_string(),
            artifacts: ArtifactPaths::default(),
            forest: ForestConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrainerError> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .map_err(|e| TrainerError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| TrainerError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Write configuration as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TrainerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TrainerError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)
            .map_err(|e| TrainerError::Config(format!("Failed to write config file: {}", e)))
    }
}
