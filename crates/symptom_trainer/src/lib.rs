//! Symptom Checker Trainer - deterministic offline random-forest trainer
//!
//! Reads a labeled symptom dataset, fits a label encoder and a random forest
//! with fixed seeds, and writes the classifier and encoder artifacts the
//! predictor loads.

pub mod cart;
pub mod config;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod trainer;

use symptom_core::{save_artifacts, ArtifactDigests};
use tracing::{debug, info};

pub use config::{TrainerConfig, DEFAULT_DATASET_PATH};
pub use dataset::{Dataset, DEFAULT_OUTCOME_COLUMN};
pub use deterministic::{LcgRng, SplitTieBreaker, TrainTestSplit, HOLDOUT_PPM};
pub use errors::TrainerError;
pub use trainer::{ForestConfig, ForestTrainer, TrainingOutcome};

/// Load the configured dataset, mapping reader failures to `TrainerError::Dataset`
pub fn load_dataset(config: &TrainerConfig) -> Result<Dataset, TrainerError> {
    info!("Loading dataset from: {}", config.dataset_path.display());
    Dataset::from_csv(&config.dataset_path, &config.outcome_column)
        .map_err(|err| TrainerError::Dataset(format!("{err:#}")))
}

/// Log dataset shape, label distribution and symptom coverage
pub fn log_dataset_summary(dataset: &Dataset) {
    info!(
        "Loaded {} samples with {} symptoms",
        dataset.len(),
        dataset.feature_count()
    );

    info!("Label distribution:");
    for (label, count) in dataset.label_counts() {
        info!("  {}: {}", label, count);
    }

    let frequencies = dataset.symptom_frequencies();
    let unused: Vec<&str> = dataset
        .vocabulary
        .iter()
        .zip(&frequencies)
        .filter(|(_, count)| **count == 0)
        .map(|(name, _)| name)
        .collect();
    if !unused.is_empty() {
        info!("{} symptoms never present: {:?}", unused.len(), unused);
    }
    for (name, count) in dataset.vocabulary.iter().zip(&frequencies) {
        debug!("  {}: present in {} rows", name, count);
    }
}

/// Load the configured dataset and train a forest on it
pub fn train_from_config(config: &TrainerConfig) -> Result<TrainingOutcome, TrainerError> {
    let dataset = load_dataset(config)?;
    log_dataset_summary(&dataset);
    ForestTrainer::new(config.forest.clone()).train(&dataset)
}

/// Train and persist both artifacts, returning the outcome and file digests
pub fn train_and_save(
    config: &TrainerConfig,
) -> Result<(TrainingOutcome, ArtifactDigests), TrainerError> {
    let outcome = train_from_config(config)?;
    let digests = save_artifacts(&outcome.model, &outcome.encoder, &config.artifacts)?;
    Ok((outcome, digests))
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
