//! Error types for the symptom checker core

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading artifacts or running inference
#[derive(Error, Debug)]
pub enum CoreError {
    /// An artifact file is missing, unreadable or not valid JSON
    #[error("failed to load artifact {}: {reason}", .path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Classifier and label encoder come from different trainings
    #[error("artifact mismatch: {0}")]
    ArtifactMismatch(String),

    /// Model or encoder failed structural validation
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Feature vector does not line up with the trained vocabulary
    #[error("feature vector has {actual} entries, model expects {expected}")]
    FeatureLengthMismatch { expected: usize, actual: usize },

    /// Predicted code has no entry in the label encoder
    #[error("unknown label code {code} (encoder has {classes} classes)")]
    UnknownCode { code: usize, classes: usize },

    /// Label was not seen when the encoder was fitted
    #[error("unknown label: {0:?}")]
    UnknownLabel(String),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn artifact_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
