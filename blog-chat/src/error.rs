//! Error types for the chat classifier

use std::path::PathBuf;
use thiserror::Error;

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// Classifier, training and artifact errors
#[derive(Debug, Error)]
pub enum ChatError {
    /// Reading or writing a file failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON artifact or intents file did not (de)serialize
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Model dimensions disagree with the vocabulary/label set or input
    #[error("Dimension mismatch for {artifact}: expected {expected}, got {actual}")]
    DimensionMismatch {
        artifact: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A model file could not be read or written as safetensors
    #[error("Model file error in {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: candle_core::Error,
    },

    /// Tensor operation failed
    #[error("Tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Model parameters are internally inconsistent
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Training corpus has no patterns to learn from
    #[error("Training corpus contains no patterns")]
    EmptyCorpus,

    /// A document refers to a tag missing from the label set
    #[error("Unknown label: {0}")]
    UnknownLabel(String),
}

impl ChatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChatError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ChatError::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn model(path: impl Into<PathBuf>, source: candle_core::Error) -> Self {
        ChatError::Model {
            path: path.into(),
            source,
        }
    }
}
