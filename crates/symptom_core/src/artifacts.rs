//! Artifact persistence
//!
//! The trainer writes two independent files, the classifier and the label
//! encoder, each with a `.hash` sidecar holding the BLAKE3 of its bytes.
//! Loading checks that the pair comes from the same training run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{CoreError, Result};
use crate::forest::ForestModel;
use crate::label_encoder::LabelEncoder;
use crate::serialization::hash_bytes_hex;
use crate::{DEFAULT_ENCODER_PATH, DEFAULT_MODEL_PATH};

/// Locations of the classifier and label-encoder artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub encoder: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            encoder: PathBuf::from(DEFAULT_ENCODER_PATH),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, encoder: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            encoder: encoder.into(),
        }
    }

    /// Default artifact names placed under `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(DEFAULT_MODEL_PATH), dir.join(DEFAULT_ENCODER_PATH))
    }
}

/// BLAKE3 digests of the artifact bytes as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDigests {
    pub model: String,
    pub encoder: String,
}

/// Path of the digest sidecar for an artifact (`model.json` -> `model.hash`)
pub fn hash_sidecar_path(path: &Path) -> PathBuf {
    path.with_extension("hash")
}

fn write_artifact(path: &Path, contents: &str) -> Result<String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, contents)?;

    let digest = hash_bytes_hex(contents.as_bytes());
    fs::write(hash_sidecar_path(path), &digest)?;
    debug!("Wrote {} ({})", path.display(), digest);

    Ok(digest)
}

/// Fail if the classifier and encoder do not belong together
pub fn check_alignment(model: &ForestModel, encoder: &LabelEncoder) -> Result<()> {
    if model.n_classes != encoder.len() {
        return Err(CoreError::ArtifactMismatch(format!(
            "classifier emits {} classes but label encoder has {}",
            model.n_classes,
            encoder.len()
        )));
    }

    let expected = &model.metadata.encoder_hash;
    if !expected.is_empty() {
        let actual = encoder.hash_hex()?;
        if &actual != expected {
            return Err(CoreError::ArtifactMismatch(format!(
                "label encoder hash {actual} does not match classifier record {expected}"
            )));
        }
    }

    Ok(())
}

/// Persist both artifacts and their digest sidecars
pub fn save_artifacts(
    model: &ForestModel,
    encoder: &LabelEncoder,
    paths: &ArtifactPaths,
) -> Result<ArtifactDigests> {
    check_alignment(model, encoder)?;

    info!("Saving classifier to: {}", paths.model.display());
    let model_digest = write_artifact(&paths.model, &model.to_canonical_json()?)?;

    info!("Saving label encoder to: {}", paths.encoder.display());
    let encoder_digest = write_artifact(&paths.encoder, &encoder.to_canonical_json()?)?;

    Ok(ArtifactDigests {
        model: model_digest,
        encoder: encoder_digest,
    })
}

/// Load both artifacts and check that they belong to the same training run
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<(ForestModel, LabelEncoder)> {
    debug!("Loading classifier from: {}", paths.model.display());
    let model = ForestModel::load_json(&paths.model)?;

    debug!("Loading label encoder from: {}", paths.encoder.display());
    let encoder = LabelEncoder::load_json(&paths.encoder)?;

    check_alignment(&model, &encoder)?;

    debug!(
        "Loaded {} trees over {} symptoms, {} classes",
        model.num_trees(),
        model.feature_count(),
        encoder.len()
    );

    Ok((model, encoder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{Node, Tree};
    use crate::vocabulary::Vocabulary;
    use tempfile::tempdir;

    fn pair() -> (ForestModel, LabelEncoder) {
        let encoder = LabelEncoder::fit(["Allergy", "Fungal infection"]).unwrap();
        let vocab = Vocabulary::new(vec!["itching".into()]).unwrap();
        let mut model = ForestModel::new(
            vocab,
            2,
            vec![Tree::new(vec![
                Node::internal(0, 0, 0, 1, 2),
                Node::leaf(1, 0),
                Node::leaf(2, 1),
            ])],
        );
        model.metadata.encoder_hash = encoder.hash_hex().unwrap();
        (model, encoder)
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let (model, encoder) = pair();

        let digests = save_artifacts(&model, &encoder, &paths).unwrap();
        let sidecar = fs::read_to_string(hash_sidecar_path(&paths.model)).unwrap();
        assert_eq!(sidecar, digests.model);

        let (loaded_model, loaded_encoder) = load_artifacts(&paths).unwrap();
        assert_eq!(loaded_model, model);
        assert_eq!(loaded_encoder, encoder);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, CoreError::ArtifactLoad { .. }));
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let (model, encoder) = pair();
        save_artifacts(&model, &encoder, &paths).unwrap();
        fs::write(&paths.model, "{ not json").unwrap();

        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, CoreError::ArtifactLoad { .. }));
    }

    #[test]
    fn test_encoder_from_other_training_is_rejected() {
        let (model, _) = pair();
        let other = LabelEncoder::fit(["Acne", "Malaria"]).unwrap();
        let err = check_alignment(&model, &other).unwrap_err();
        assert!(matches!(err, CoreError::ArtifactMismatch(_)));

        let bigger = LabelEncoder::fit(["Acne", "Allergy", "Malaria"]).unwrap();
        assert!(check_alignment(&model, &bigger).is_err());
    }
}
