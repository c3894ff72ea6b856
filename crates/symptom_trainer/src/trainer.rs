//! Random-forest trainer
//!
//! Encodes labels, performs the seeded 80/20 split, grows bootstrapped CART
//! trees on the training partition and scores the held-out partition.

use serde::{Deserialize, Serialize};
use symptom_core::{ForestMetadata, ForestModel, LabelEncoder};
use tracing::{debug, info};

use crate::cart::{CartBuilder, TreeConfig};
use crate::dataset::Dataset;
use crate::deterministic::{LcgRng, TrainTestSplit};
use crate::errors::TrainerError;

/// Forest training configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub num_trees: usize,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    /// Features tried per split; `None` means ceil(sqrt(feature_count))
    pub max_features: Option<usize>,
    /// Resample the training partition for every tree
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_trees: 100,
            max_depth: 16,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Features considered per split for a vocabulary of `feature_count`
    pub fn features_per_split(&self, feature_count: usize) -> usize {
        let k = self
            .max_features
            .unwrap_or_else(|| (feature_count as f64).sqrt().ceil() as usize);
        k.clamp(1, feature_count.max(1))
    }

    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.num_trees == 0 {
            return Err(TrainerError::Config("num_trees must be at least 1".into()));
        }
        if self.min_samples_leaf == 0 {
            return Err(TrainerError::Config(
                "min_samples_leaf must be at least 1".into(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(TrainerError::Config(
                "max_features must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Everything a training run produces
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: ForestModel,
    pub encoder: LabelEncoder,
    pub split: TrainTestSplit,
    /// Correct held-out predictions
    pub holdout_correct: usize,
}

impl TrainingOutcome {
    /// Held-out accuracy in parts per million
    pub fn holdout_accuracy_ppm(&self) -> u32 {
        if self.split.test.is_empty() {
            return 0;
        }
        ((self.holdout_correct as u64 * 1_000_000) / self.split.test.len() as u64) as u32
    }
}

/// Random-forest trainer
pub struct ForestTrainer {
    config: ForestConfig,
}

impl ForestTrainer {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Train a forest on the given dataset
    pub fn train(&self, dataset: &Dataset) -> Result<TrainingOutcome, TrainerError> {
        self.config.validate()?;

        let encoder = LabelEncoder::fit(&dataset.labels)?;
        let codes = encoder.transform_all(&dataset.labels)?;
        info!(
            "Encoded {} rows into {} classes",
            codes.len(),
            encoder.len()
        );

        let split = TrainTestSplit::new(dataset.len(), self.config.seed).ok_or_else(|| {
            TrainerError::Dataset(format!(
                "need at least 2 rows to hold out a test partition, got {}",
                dataset.len()
            ))
        })?;
        info!(
            "Split {} rows: {} train / {} test (seed {})",
            dataset.len(),
            split.train.len(),
            split.test.len(),
            self.config.seed
        );

        let feature_count = dataset.feature_count();
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: self.config.features_per_split(feature_count),
        };
        debug!("Features per split: {}", tree_config.max_features);

        let builder = CartBuilder::new(&dataset.features, &codes, encoder.len(), tree_config);

        let mut trees = Vec::with_capacity(self.config.num_trees);
        for tree_idx in 0..self.config.num_trees {
            let mut rng = LcgRng::derive(self.config.seed, tree_idx as u64);

            let samples = if self.config.bootstrap {
                rng.bootstrap(&split.train, split.train.len())
            } else {
                split.train.clone()
            };

            let tree = builder.build(&samples, &mut rng);
            debug!(
                "Tree {}/{}: {} nodes, depth {}",
                tree_idx + 1,
                self.config.num_trees,
                tree.nodes.len(),
                tree.depth()
            );
            trees.push(tree);
        }

        let mut model = ForestModel::new(dataset.vocabulary.clone(), encoder.len(), trees);
        model.validate()?;

        let mut holdout_correct = 0usize;
        for &row in &split.test {
            if model.predict(&dataset.features[row])? == codes[row] {
                holdout_correct += 1;
            }
        }

        let mut outcome = TrainingOutcome {
            model,
            encoder,
            split,
            holdout_correct,
        };

        outcome.model.metadata = ForestMetadata {
            created_at: chrono::Utc::now().timestamp().max(0) as u64,
            seed: self.config.seed,
            tree_count: outcome.model.num_trees(),
            max_depth: self.config.max_depth,
            encoder_hash: outcome.encoder.hash_hex()?,
            dataset_hash: dataset.source_hash.clone(),
            model_hash: outcome.model.structure_hash()?,
            train_rows: outcome.split.train.len(),
            test_rows: outcome.split.test.len(),
            holdout_accuracy_ppm: outcome.holdout_accuracy_ppm(),
        };

        Ok(outcome)
    }
}
