//! Training artifacts shared between `blog-train` and the inference side
//!
//! Three files in one directory:
//! - `words.json`: sorted vocabulary
//! - `classes.json`: sorted label set
//! - `chatbot_model.safetensors`: network parameters; layer widths are
//!   implied by the tensor shapes
//!
//! Saving overwrites existing files. Loading fails if the model's
//! dimensions disagree with the vocabulary or label set.

use crate::network::Network;
use crate::vocabulary::{LabelSet, Vocabulary};
use crate::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const VOCABULARY_FILE: &str = "words.json";
pub const LABELS_FILE: &str = "classes.json";
pub const MODEL_FILE: &str = "chatbot_model.safetensors";

/// Locations of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub vocabulary: PathBuf,
    pub labels: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            vocabulary: dir.join(VOCABULARY_FILE),
            labels: dir.join(LABELS_FILE),
            model: dir.join(MODEL_FILE),
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|e| ChatError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| ChatError::json(path, e))?;
    writer.flush().map_err(|e| ChatError::io(path, e))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| ChatError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ChatError::json(path, e))
}

/// Persist vocabulary, labels and model, creating the directory if needed
pub fn save_artifacts(
    paths: &ArtifactPaths,
    vocabulary: &Vocabulary,
    labels: &LabelSet,
    network: &Network,
) -> Result<()> {
    for path in [&paths.vocabulary, &paths.labels, &paths.model] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ChatError::io(parent, e))?;
        }
    }

    write_json(&paths.vocabulary, &vocabulary.as_slice())?;
    write_json(&paths.labels, &labels.as_slice())?;
    network.save(&paths.model)?;

    info!(
        "Saved artifacts: {} ({} words), {} ({} classes), {}",
        paths.vocabulary.display(),
        vocabulary.len(),
        paths.labels.display(),
        labels.len(),
        paths.model.display()
    );
    Ok(())
}

/// Load and cross-check the three artifacts
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<(Vocabulary, LabelSet, Network)> {
    let words: Vec<String> = read_json(&paths.vocabulary)?;
    let classes: Vec<String> = read_json(&paths.labels)?;
    let vocabulary = sorted_index(&paths.vocabulary, words)?;
    let labels = sorted_index(&paths.labels, classes)?;
    let network = Network::load(&paths.model)?;

    check_dimensions(&vocabulary, &labels, &network)?;

    Ok((vocabulary, labels, network))
}

/// Indices come from file order, so the file must already be sorted and unique
fn sorted_index(path: &Path, entries: Vec<String>) -> Result<Vocabulary> {
    let index = Vocabulary::new(entries.iter().cloned());
    if index.as_slice() != entries.as_slice() {
        return Err(ChatError::InvalidModel(format!(
            "{} is not a sorted list of unique entries",
            path.display()
        )));
    }
    Ok(index)
}

/// Model input must match the vocabulary, output must match the label set
pub fn check_dimensions(vocabulary: &Vocabulary, labels: &LabelSet, network: &Network) -> Result<()> {
    if network.input_dim() != vocabulary.len() {
        return Err(ChatError::DimensionMismatch {
            artifact: "vocabulary",
            expected: network.input_dim(),
            actual: vocabulary.len(),
        });
    }
    if network.output_dim() != labels.len() {
        return Err(ChatError::DimensionMismatch {
            artifact: "labels",
            expected: network.output_dim(),
            actual: labels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn fixture() -> (Vocabulary, LabelSet, Network) {
        let mut rng = StdRng::seed_from_u64(11);
        let vocabulary = Vocabulary::new(["hello", "hi", "bye"]);
        let labels = LabelSet::new(["goodbye", "greeting"]);
        let network = Network::feed_forward(3, &[8, 4], 2, 0.5, &mut rng).unwrap();
        (vocabulary, labels, network)
    }

    #[test]
    fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(&temp_dir.path().join("nested"));
        let (vocabulary, labels, network) = fixture();

        save_artifacts(&paths, &vocabulary, &labels, &network).unwrap();
        let (v, l, n) = load_artifacts(&paths).unwrap();

        assert_eq!(v, vocabulary);
        assert_eq!(l, labels);
        let input = [1.0, 0.0, 1.0];
        assert_eq!(n.predict(&input).unwrap(), network.predict(&input).unwrap());
    }

    #[test]
    fn test_words_file_is_plain_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(temp_dir.path());
        let (vocabulary, labels, network) = fixture();
        save_artifacts(&paths, &vocabulary, &labels, &network).unwrap();

        let words: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&paths.vocabulary).unwrap()).unwrap();
        assert_eq!(words, vec!["bye", "hello", "hi"]);
    }

    #[test]
    fn test_vocabulary_size_mismatch_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(temp_dir.path());
        let (vocabulary, labels, network) = fixture();
        save_artifacts(&paths, &vocabulary, &labels, &network).unwrap();

        std::fs::write(&paths.vocabulary, r#"["bye", "hello"]"#).unwrap();
        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(
            err,
            ChatError::DimensionMismatch { artifact: "vocabulary", expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_label_size_mismatch_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(temp_dir.path());
        let (vocabulary, labels, network) = fixture();
        save_artifacts(&paths, &vocabulary, &labels, &network).unwrap();

        std::fs::write(&paths.labels, r#"["a", "b", "c"]"#).unwrap();
        assert!(matches!(
            load_artifacts(&paths),
            Err(ChatError::DimensionMismatch { artifact: "labels", .. })
        ));
    }

    #[test]
    fn test_unsorted_words_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(temp_dir.path());
        let (vocabulary, labels, network) = fixture();
        save_artifacts(&paths, &vocabulary, &labels, &network).unwrap();

        std::fs::write(&paths.vocabulary, r#"["hi", "hello", "bye"]"#).unwrap();
        assert!(matches!(load_artifacts(&paths), Err(ChatError::InvalidModel(_))));
    }

    #[test]
    fn test_corrupt_model_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(temp_dir.path());
        let (vocabulary, labels, network) = fixture();
        save_artifacts(&paths, &vocabulary, &labels, &network).unwrap();

        std::fs::write(&paths.model, b"{}").unwrap();
        assert!(matches!(load_artifacts(&paths), Err(ChatError::Model { .. })));
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(temp_dir.path());
        assert!(matches!(load_artifacts(&paths), Err(ChatError::Io { .. })));
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(temp_dir.path());
        let (vocabulary, labels, network) = fixture();
        std::fs::write(&paths.vocabulary, "stale").unwrap();
        save_artifacts(&paths, &vocabulary, &labels, &network).unwrap();
        assert!(load_artifacts(&paths).is_ok());
    }
}
