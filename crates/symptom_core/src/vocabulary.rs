//! Symptom vocabulary
//!
//! The ordered list of symptom names fixed at training time. It is the
//! contract between trainer and predictor: position `i` of every feature
//! vector refers to `names[i]`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::errors::{CoreError, Result};

/// Binary presence indicator per vocabulary entry (0 or 1).
pub type FeatureVector = Vec<u8>;

/// Normalise a dataset column name into a matchable symptom name.
///
/// Underscores become spaces, whitespace runs collapse to one space and the
/// result is trimmed, so `" skin_rash"` becomes `"skin rash"`.
pub fn normalize_symptom_name(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered symptom names recorded in the classifier artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    names: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from raw dataset column names.
    ///
    /// Each name is normalised. A name seen before (case-insensitively, after
    /// normalisation) gets the first free `.1`, `.2`, ... suffix, the way
    /// pandas mangles repeated headers. Blank names are rejected.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for raw in columns {
            let base = normalize_symptom_name(raw.as_ref());
            let mut name = base.clone();
            let mut suffix = 0usize;
            while !base.is_empty() && !seen.insert(name.to_lowercase()) {
                suffix += 1;
                name = format!("{base}.{suffix}");
            }
            if suffix > 0 {
                warn!("Repeated symptom column {:?} renamed to {:?}", raw.as_ref(), name);
            }
            names.push(name);
        }

        Self::new(names)
    }

    /// Wrap already-normalised names, checking they are usable for matching.
    pub fn new(names: Vec<String>) -> Result<Self> {
        let vocabulary = Self { names };
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Validate that the vocabulary is non-empty with unique, non-blank names
    pub fn validate(&self) -> Result<()> {
        if self.names.is_empty() {
            return Err(CoreError::ValidationFailed(
                "vocabulary has no symptoms".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.names.len());
        for (i, name) in self.names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(CoreError::ValidationFailed(format!(
                    "vocabulary entry {i} is blank"
                )));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(CoreError::ValidationFailed(format!(
                    "duplicate symptom in vocabulary: {name:?}"
                )));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

}
