//! Random-forest classifier artifact
//!
//! The model owns the vocabulary it was trained on, so the predictor can
//! rebuild feature vectors in exactly the trained column order. Prediction
//! is a majority vote over the trees; ties go to the lowest class code.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::tree::Tree;
use crate::errors::{CoreError, Result};
use crate::serialization::{canonical_json_string, hash_canonical_hex};
use crate::vocabulary::Vocabulary;

/// Current artifact format version
pub const FORMAT_VERSION: i32 = 1;

/// Training provenance recorded next to the trees
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForestMetadata {
    /// Unix timestamp of the training run
    pub created_at: u64,
    /// Seed used for the split, bootstraps and feature sampling
    pub seed: u64,
    pub tree_count: usize,
    pub max_depth: usize,
    /// BLAKE3 of the label encoder this model was trained with
    pub encoder_hash: String,
    /// BLAKE3 of the raw training dataset bytes
    pub dataset_hash: String,
    /// BLAKE3 of the structural part of the model (vocabulary, classes, trees)
    pub model_hash: String,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Held-out accuracy in parts per million
    pub holdout_accuracy_ppm: u32,
}

/// Ensemble of classification trees over a fixed symptom vocabulary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestModel {
    /// Model format version (always 1 for now)
    pub version: i32,

    /// Ordered feature names seen at fit time
    pub feature_names: Vocabulary,

    /// Number of distinct class codes the trees may emit
    pub n_classes: usize,

    /// Decision trees in the ensemble
    pub trees: Vec<Tree>,

    pub metadata: ForestMetadata,
}

/// The part of the model that determines predictions
#[derive(Serialize)]
struct ModelStructure<'a> {
    feature_names: &'a Vocabulary,
    n_classes: usize,
    trees: &'a [Tree],
}

impl ForestModel {
    pub fn new(feature_names: Vocabulary, n_classes: usize, trees: Vec<Tree>) -> Self {
        Self {
            version: FORMAT_VERSION,
            feature_names,
            n_classes,
            trees,
            metadata: ForestMetadata::default(),
        }
    }

    /// Validate model structure
    pub fn validate(&self) -> Result<()> {
        if self.version != FORMAT_VERSION {
            return Err(CoreError::ValidationFailed(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }

        self.feature_names.validate()?;

        if self.n_classes == 0 {
            return Err(CoreError::ValidationFailed(
                "Model has no classes".to_string(),
            ));
        }

        if self.trees.is_empty() {
            return Err(CoreError::ValidationFailed(
                "Model has no trees".to_string(),
            ));
        }

        let feature_count = self.feature_names.len();
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(feature_count, self.n_classes).map_err(|e| {
                CoreError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }

        Ok(())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.feature_names
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Per-class vote counts for a feature vector
    pub fn votes(&self, features: &[u8]) -> Result<Vec<u32>> {
        let expected = self.feature_count();
        if features.len() != expected {
            return Err(CoreError::FeatureLengthMismatch {
                expected,
                actual: features.len(),
            });
        }

        let mut votes = vec![0u32; self.n_classes];
        for (i, tree) in self.trees.iter().enumerate() {
            let class = tree.evaluate(features).ok_or_else(|| {
                CoreError::ValidationFailed(format!("Tree {i} failed to reach a leaf"))
            })?;
            let slot = votes.get_mut(class as usize).ok_or(CoreError::UnknownCode {
                code: class as usize,
                classes: self.n_classes,
            })?;
            *slot += 1;
        }

        Ok(votes)
    }

    /// Predict the class code for a single feature vector
    pub fn predict(&self, features: &[u8]) -> Result<usize> {
        let votes = self.votes(features)?;

        // Strict comparison keeps the lowest code on ties
        let mut best = 0usize;
        for (code, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = code;
            }
        }

        Ok(best)
    }

    /// Compute the structural hash (vocabulary, class count, trees)
    pub fn structure_hash(&self) -> Result<String> {
        let structure = ModelStructure {
            feature_names: &self.feature_names,
            n_classes: self.n_classes,
            trees: &self.trees,
        };
        Ok(hash_canonical_hex(&structure)?)
    }

    /// Serialize model to canonical JSON (sorted keys)
    pub fn to_canonical_json(&self) -> Result<String> {
        Ok(canonical_json_string(self)?)
    }

    /// Load and validate a model artifact
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json =
            fs::read_to_string(path).map_err(|err| CoreError::artifact_load(path, err))?;
        let model: ForestModel =
            serde_json::from_str(&json).map_err(|err| CoreError::artifact_load(path, err))?;
        model
            .validate()
            .map_err(|err| CoreError::artifact_load(path, err))?;
        Ok(model)
    }
}
