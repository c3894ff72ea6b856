//! Predictor configuration
//!
//! Resolution order: built-in defaults, then an optional TOML file, then
//! `SYMPTOM_CHECKER_*` environment variables. Command-line flags are applied
//! on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::artifacts::ArtifactPaths;
use crate::errors::{CoreError, Result};
use crate::specialists::SpecialistTable;

pub const ENV_MODEL_PATH: &str = "SYMPTOM_CHECKER_MODEL";
pub const ENV_ENCODER_PATH: &str = "SYMPTOM_CHECKER_ENCODER";
pub const ENV_SPECIALISTS_PATH: &str = "SYMPTOM_CHECKER_SPECIALISTS";
pub const ENV_LOG_LEVEL: &str = "SYMPTOM_CHECKER_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Classifier and label-encoder locations
    pub artifacts: ArtifactPaths,
    /// Optional TOML file extending the built-in specialist table
    pub specialists_path: Option<PathBuf>,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactPaths::default(),
            specialists_path: None,
            log_level: "warn".to_string(),
        }
    }
}

impl CheckerConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| CoreError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_MODEL_PATH) {
            self.artifacts.model = PathBuf::from(val);
        }

        if let Some(val) = lookup(ENV_ENCODER_PATH) {
            self.artifacts.encoder = PathBuf::from(val);
        }

        if let Some(val) = lookup(ENV_SPECIALISTS_PATH) {
            self.specialists_path = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup(ENV_LOG_LEVEL) {
            self.log_level = val;
        }
    }

    /// Build the specialist table this configuration describes
    pub fn specialist_table(&self) -> Result<SpecialistTable> {
        match &self.specialists_path {
            Some(path) => SpecialistTable::builtin_with_overrides(path),
            None => Ok(SpecialistTable::builtin()),
        }
    }
}
