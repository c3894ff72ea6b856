//! Label encoder
//!
//! Bidirectional mapping between disease names and dense integer codes.
//! Classes are kept sorted, so the code of a label is its index in `classes`
//! and fitting the same label set always yields the same mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::errors::{CoreError, Result};
use crate::serialization::{canonical_json_string, hash_canonical_hex};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Distinct labels in ascending order; the code of a label is its index
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit the encoder over every label seen in the training data
    pub fn fit<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();

        let encoder = Self {
            classes: classes.into_iter().collect(),
        };
        encoder.validate()?;
        Ok(encoder)
    }

    /// Check the class list is non-empty, sorted and free of duplicates
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(CoreError::ValidationFailed(
                "label encoder has no classes".to_string(),
            ));
        }
        if let Some(pair) = self.classes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CoreError::ValidationFailed(format!(
                "label encoder classes not strictly sorted at {:?}",
                pair[1]
            )));
        }
        Ok(())
    }

    /// Encode a single label
    pub fn transform(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .map_err(|_| CoreError::UnknownLabel(label.to_string()))
    }

    /// Encode a sequence of labels
    pub fn transform_all<I, S>(&self, labels: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.transform(label.as_ref()))
            .collect()
    }

    /// Decode a code back to its label
    pub fn inverse_transform(&self, code: usize) -> Result<&str> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(CoreError::UnknownCode {
                code,
                classes: self.classes.len(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// BLAKE3 hex digest of the canonical encoder JSON
    pub fn hash_hex(&self) -> Result<String> {
        Ok(hash_canonical_hex(self)?)
    }

    pub fn to_canonical_json(&self) -> Result<String> {
        Ok(canonical_json_string(self)?)
    }

    /// Load and validate an encoder artifact
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json =
            fs::read_to_string(path).map_err(|err| CoreError::artifact_load(path, err))?;
        let encoder: LabelEncoder =
            serde_json::from_str(&json).map_err(|err| CoreError::artifact_load(path, err))?;
        encoder
            .validate()
            .map_err(|err| CoreError::artifact_load(path, err))?;
        Ok(encoder)
    }
}
