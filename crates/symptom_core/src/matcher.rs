//! Free-text to feature-vector matching
//!
//! The predictor never inspects text itself; it asks a [`SymptomMatcher`]
//! whether each vocabulary entry is present. [`SubstringMatcher`] is plain
//! case-insensitive substring containment: no tokenization, no stemming and
//! no negation handling, so "no fever" still sets `fever`.

use crate::vocabulary::{FeatureVector, Vocabulary};

/// Decides which vocabulary entries a free-text description mentions
pub trait SymptomMatcher: Send + Sync {
    /// Whether `symptom` occurs in `text_lower`, which is already lower-cased.
    fn is_present(&self, text_lower: &str, symptom: &str) -> bool;

    /// Build the feature vector for `text`, one entry per vocabulary name.
    fn encode(&self, vocabulary: &Vocabulary, text: &str) -> FeatureVector {
        let text_lower = text.to_lowercase();
        vocabulary
            .iter()
            .map(|symptom| u8::from(self.is_present(&text_lower, symptom)))
            .collect()
    }
}

/// Case-insensitive substring containment
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl SymptomMatcher for SubstringMatcher {
    fn is_present(&self, text_lower: &str, symptom: &str) -> bool {
        text_lower.contains(&symptom.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(names: &[&str]) -> Vocabulary {
        Vocabulary::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_itching_and_skin_rash() {
        let v = vocab(&["itching", "skin rash", "continuous sneezing", "shivering"]);
        let features = SubstringMatcher.encode(&v, "itching and skin rash");
        assert_eq!(features, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_case_insensitive() {
        let v = vocab(&["Chills", "fatigue"]);
        assert_eq!(SubstringMatcher.encode(&v, "CHILLS, Fatigue"), vec![1, 1]);
    }

    #[test]
    fn test_empty_text_is_all_zero() {
        let v = vocab(&["itching", "skin rash", "fever"]);
        assert_eq!(SubstringMatcher.encode(&v, ""), vec![0, 0, 0]);
    }

    #[test]
    fn test_negation_is_not_understood() {
        let v = vocab(&["fever"]);
        assert_eq!(SubstringMatcher.encode(&v, "no fever at all"), vec![1]);
    }

    #[test]
    fn test_substring_false_positive() {
        // "ache" is contained in "headache"
        let v = vocab(&["ache", "headache"]);
        assert_eq!(SubstringMatcher.encode(&v, "mild headache"), vec![1, 1]);
    }
}
