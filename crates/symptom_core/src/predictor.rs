//! Free text to case report
//!
//! A [`Predictor`] holds the loaded artifacts, the specialist table and a
//! matcher. It is immutable once built, so a long-lived caller can load it
//! once and share it; the CLI builds one per invocation.

use tracing::debug;

use crate::artifacts::{check_alignment, load_artifacts, ArtifactPaths};
use crate::errors::Result;
use crate::forest::ForestModel;
use crate::label_encoder::LabelEncoder;
use crate::matcher::{SubstringMatcher, SymptomMatcher};
use crate::report::CaseReport;
use crate::specialists::SpecialistTable;
use crate::vocabulary::{FeatureVector, Vocabulary};

pub struct Predictor<M = SubstringMatcher> {
    model: ForestModel,
    encoder: LabelEncoder,
    specialists: SpecialistTable,
    matcher: M,
}

impl Predictor<SubstringMatcher> {
    /// Load both artifacts from disk and pair them with a specialist table
    pub fn load(paths: &ArtifactPaths, specialists: SpecialistTable) -> Result<Self> {
        let (model, encoder) = load_artifacts(paths)?;
        Self::from_parts(model, encoder, specialists)
    }

    /// Build from artifacts already in memory
    pub fn from_parts(
        model: ForestModel,
        encoder: LabelEncoder,
        specialists: SpecialistTable,
    ) -> Result<Self> {
        model.validate()?;
        check_alignment(&model, &encoder)?;
        Ok(Self {
            model,
            encoder,
            specialists,
            matcher: SubstringMatcher,
        })
    }
}

impl<M: SymptomMatcher> Predictor<M> {
    /// Swap the symptom matcher, keeping everything else
    pub fn with_matcher<N: SymptomMatcher>(self, matcher: N) -> Predictor<N> {
        Predictor {
            model: self.model,
            encoder: self.encoder,
            specialists: self.specialists,
            matcher,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.model.vocabulary()
    }

    pub fn model(&self) -> &ForestModel {
        &self.model
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn specialists(&self) -> &SpecialistTable {
        &self.specialists
    }

    /// Feature vector for `text` in trained vocabulary order
    pub fn feature_vector(&self, text: &str) -> FeatureVector {
        self.matcher.encode(self.model.vocabulary(), text)
    }

    /// Predicted disease name for `text`
    pub fn predict_disease(&self, text: &str) -> Result<&str> {
        let features = self.feature_vector(text);
        let matched = features.iter().filter(|&&f| f == 1).count();
        debug!(
            "Matched {} of {} symptoms",
            matched,
            self.model.feature_count()
        );

        let code = self.model.predict(&features)?;
        let disease = self.encoder.inverse_transform(code)?;
        debug!("Predicted class {} ({})", code, disease);
        Ok(disease)
    }

    /// Full case report for `text`
    pub fn predict(&self, text: &str) -> Result<CaseReport> {
        let disease = self.predict_disease(text)?;
        if !self.specialists.contains(disease) {
            debug!(
                "No specialist mapped for {:?}, using {:?}",
                disease,
                self.specialists.default_specialist()
            );
        }
        let specialist = self.specialists.resolve(disease);
        Ok(CaseReport::new(text, disease, specialist))
    }
}

/// One-shot prediction: load artifacts, predict, drop everything
pub fn predict_case(
    text: &str,
    paths: &ArtifactPaths,
    specialists: SpecialistTable,
) -> Result<CaseReport> {
    Predictor::load(paths, specialists)?.predict(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreError;
    use crate::forest::{Node, Tree};

    /// Vocabulary [itching, skin rash, chills]; classes [Allergy, Fungal infection, Malaria]
    fn predictor() -> Predictor {
        let encoder = LabelEncoder::fit(["Allergy", "Fungal infection", "Malaria"]).unwrap();
        let vocab = Vocabulary::new(vec![
            "itching".to_string(),
            "skin rash".to_string(),
            "chills".to_string(),
        ])
        .unwrap();
        // itching -> Fungal infection, else chills -> Malaria, else Allergy
        let tree = Tree::new(vec![
            Node::internal(0, 0, 0, 1, 4),
            Node::internal(1, 2, 0, 2, 3),
            Node::leaf(2, 0),
            Node::leaf(3, 2),
            Node::leaf(4, 1),
        ]);
        let mut model = ForestModel::new(vocab, 3, vec![tree]);
        model.metadata.encoder_hash = encoder.hash_hex().unwrap();
        Predictor::from_parts(model, encoder, SpecialistTable::builtin()).unwrap()
    }

    struct NeverMatcher;

    impl SymptomMatcher for NeverMatcher {
        fn is_present(&self, _text_lower: &str, _symptom: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_predict_report() {
        let report = predictor().predict("itching and skin rash").unwrap();
        assert_eq!(report.patient_case.symptoms, "itching and skin rash");
        assert_eq!(report.patient_case.predicted_disease, "Fungal infection");
        assert_eq!(report.doctor_recommendation.specialist, "Dermatologist");
    }

    #[test]
    fn test_feature_vector_order() {
        let p = predictor();
        assert_eq!(p.feature_vector("Skin Rash, CHILLS"), vec![0, 1, 1]);
        assert_eq!(p.predict_disease("chills at night").unwrap(), "Malaria");
    }

    #[test]
    fn test_empty_text_still_predicts() {
        let p = predictor();
        assert_eq!(p.feature_vector(""), vec![0, 0, 0]);
        let report = p.predict("").unwrap();
        assert_eq!(report.patient_case.predicted_disease, "Allergy");
        assert_eq!(report.doctor_recommendation.specialist, "Allergist");
    }

    #[test]
    fn test_unmapped_disease_gets_default_specialist() {
        let p = predictor();
        let table = SpecialistTable::from_entries([(
            "Fungal infection".to_string(),
            "Dermatologist".to_string(),
        )]);
        let p = Predictor::from_parts(p.model.clone(), p.encoder.clone(), table).unwrap();

        let report = p.predict("chills").unwrap();
        assert_eq!(report.patient_case.predicted_disease, "Malaria");
        assert_eq!(report.doctor_recommendation.specialist, "General Practitioner");
        assert_eq!(p.predict("itching").unwrap().doctor_recommendation.specialist, "Dermatologist");
    }

    #[test]
    fn test_custom_matcher() {
        let p = predictor().with_matcher(NeverMatcher);
        assert_eq!(p.feature_vector("itching"), vec![0, 0, 0]);
        assert_eq!(p.predict_disease("itching").unwrap(), "Allergy");
    }

    #[test]
    fn test_mismatched_parts_are_rejected() {
        let p = predictor();
        let other = LabelEncoder::fit(["Acne", "Malaria", "Typhoid"]).unwrap();
        let err = Predictor::from_parts(p.model.clone(), other, SpecialistTable::builtin())
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::ArtifactMismatch(_)));
    }
}
