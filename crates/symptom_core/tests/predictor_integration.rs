//! End-to-end inference against pinned artifacts written to disk.

use anyhow::Result;
use proptest::prelude::*;
use std::fs;
use symptom_core::{
    artifacts::hash_sidecar_path, predict_case, save_artifacts, ArtifactPaths, CoreError,
    ForestModel, LabelEncoder, Node, Predictor, SpecialistTable, SubstringMatcher,
    SymptomMatcher, Tree, Vocabulary, DEFAULT_SPECIALIST,
};
use tempfile::TempDir;

const SYMPTOMS: [&str; 5] = ["itching", "skin rash", "continuous sneezing", "chills", "fever"];

/// Pinned model: itching -> Fungal infection; sneezing -> Allergy;
/// chills -> Malaria; anything else -> Common Cold.
fn pinned_artifacts() -> Result<(TempDir, ArtifactPaths)> {
    let encoder = LabelEncoder::fit(["Allergy", "Common Cold", "Fungal infection", "Malaria"])?;
    let vocab = Vocabulary::from_columns(["itching", "skin_rash", "continuous_sneezing", "chills", "fever"])?;

    let itching = encoder.transform("Fungal infection")? as u32;
    let sneezing = encoder.transform("Allergy")? as u32;
    let chills = encoder.transform("Malaria")? as u32;
    let cold = encoder.transform("Common Cold")? as u32;

    let tree = Tree::new(vec![
        Node::internal(0, 0, 0, 1, 6),
        Node::internal(1, 2, 0, 2, 5),
        Node::internal(2, 3, 0, 3, 4),
        Node::leaf(3, cold),
        Node::leaf(4, chills),
        Node::leaf(5, sneezing),
        Node::leaf(6, itching),
    ]);

    let mut model = ForestModel::new(vocab, encoder.len(), vec![tree.clone(), tree]);
    model.metadata.encoder_hash = encoder.hash_hex()?;

    let dir = TempDir::new()?;
    let paths = ArtifactPaths::in_dir(dir.path());
    save_artifacts(&model, &encoder, &paths)?;
    Ok((dir, paths))
}

#[test]
fn test_itching_and_skin_rash_scenario() -> Result<()> {
    let (_dir, paths) = pinned_artifacts()?;
    let predictor = Predictor::load(&paths, SpecialistTable::builtin())?;

    assert_eq!(predictor.vocabulary().names(), &SYMPTOMS);
    assert_eq!(predictor.feature_vector("itching and skin rash"), vec![1, 1, 0, 0, 0]);

    let report = predictor.predict("itching and skin rash")?;
    assert_eq!(report.patient_case.predicted_disease, "Fungal infection");
    assert_eq!(report.doctor_recommendation.specialist, "Dermatologist");

    Ok(())
}

#[test]
fn test_empty_input_against_pinned_model() -> Result<()> {
    let (_dir, paths) = pinned_artifacts()?;
    let predictor = Predictor::load(&paths, SpecialistTable::builtin())?;

    assert_eq!(predictor.feature_vector(""), vec![0; SYMPTOMS.len()]);
    let report = predictor.predict("")?;
    assert_eq!(report.patient_case.symptoms, "");
    assert_eq!(report.patient_case.predicted_disease, "Common Cold");
    assert_eq!(report.doctor_recommendation.specialist, DEFAULT_SPECIALIST);

    Ok(())
}

#[test]
fn test_one_shot_matches_loaded_predictor() -> Result<()> {
    let (_dir, paths) = pinned_artifacts()?;
    let predictor = Predictor::load(&paths, SpecialistTable::builtin())?;

    for text in ["sneezing? no: continuous sneezing", "Chills and fever", "headache"] {
        let one_shot = predict_case(text, &paths, SpecialistTable::builtin())?;
        assert_eq!(one_shot, predictor.predict(text)?);
    }

    Ok(())
}

#[test]
fn test_sidecar_hashes_are_written() -> Result<()> {
    let (_dir, paths) = pinned_artifacts()?;
    let model_hash = fs::read_to_string(hash_sidecar_path(&paths.model))?;
    let bytes = fs::read(&paths.model)?;
    assert_eq!(model_hash, hex_blake3(&bytes));
    Ok(())
}

fn hex_blake3(bytes: &[u8]) -> String {
    symptom_core::serialization::hash_bytes_hex(bytes)
}

#[test]
fn test_missing_encoder_is_artifact_load_error() -> Result<()> {
    let (_dir, paths) = pinned_artifacts()?;
    fs::remove_file(&paths.encoder)?;

    let err = Predictor::load(&paths, SpecialistTable::builtin()).err().unwrap();
    assert!(matches!(err, CoreError::ArtifactLoad { .. }));
    assert!(err.to_string().contains("symptom_checker_label_encoder.json"));
    Ok(())
}

#[test]
fn test_artifacts_from_different_trainings_fail() -> Result<()> {
    let (_dir_a, paths_a) = pinned_artifacts()?;
    let dir_b = TempDir::new()?;

    // Same class count, different labels
    let other = LabelEncoder::fit(["Acne", "Dengue", "GERD", "Typhoid"])?;
    let encoder_b = dir_b.path().join("encoder.json");
    fs::write(&encoder_b, other.to_canonical_json()?)?;

    let mixed = ArtifactPaths::new(&paths_a.model, &encoder_b);
    let err = Predictor::load(&mixed, SpecialistTable::builtin()).err().unwrap();
    assert!(matches!(err, CoreError::ArtifactMismatch(_)));
    Ok(())
}

fn vocab_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,6}( [a-z]{1,6})?", 1..12)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_feature_vector_is_substring_presence(
        names in vocab_strategy(),
        text in "[a-zA-Z ,]{0,40}",
    ) {
        let vocab = Vocabulary::new(names.clone()).unwrap();
        let features = SubstringMatcher.encode(&vocab, &text);

        prop_assert_eq!(features.len(), names.len());
        let lower = text.to_lowercase();
        for (name, flag) in names.iter().zip(&features) {
            prop_assert_eq!(*flag == 1, lower.contains(&name.to_lowercase()));
            prop_assert!(*flag <= 1);
        }
    }

    #[test]
    fn prop_encoding_is_deterministic(
        names in vocab_strategy(),
        text in "[a-z ]{0,30}",
    ) {
        let vocab = Vocabulary::new(names).unwrap();
        prop_assert_eq!(
            SubstringMatcher.encode(&vocab, &text),
            SubstringMatcher.encode(&vocab, &text)
        );
    }
}
