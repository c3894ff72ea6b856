//! Symptom Checker Core
//!
//! Shared types for the offline trainer and the one-shot predictor:
//! the symptom vocabulary and matcher, the label encoder, the random-forest
//! classifier, artifact persistence, the specialist table and the case report.

pub mod artifacts;
pub mod config;
pub mod errors;
pub mod forest;
pub mod label_encoder;
pub mod matcher;
pub mod predictor;
pub mod report;
pub mod serialization;
pub mod specialists;
pub mod vocabulary;

pub use artifacts::{load_artifacts, save_artifacts, ArtifactDigests, ArtifactPaths};
pub use config::CheckerConfig;
pub use errors::{CoreError, Result};
pub use forest::{ForestMetadata, ForestModel, Node, Tree};
pub use label_encoder::LabelEncoder;
pub use matcher::{SubstringMatcher, SymptomMatcher};
pub use predictor::{predict_case, Predictor};
pub use report::CaseReport;
pub use specialists::{SpecialistTable, DEFAULT_SPECIALIST};
pub use vocabulary::{normalize_symptom_name, FeatureVector, Vocabulary};

/// Relative path of the persisted classifier artifact.
pub const DEFAULT_MODEL_PATH: &str = "symptom_checker_model.json";

/// Relative path of the persisted label-encoder artifact.
pub const DEFAULT_ENCODER_PATH: &str = "symptom_checker_label_encoder.json";

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
