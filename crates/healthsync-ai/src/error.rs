use std::path::PathBuf;

use thiserror::Error;

/// Fitting a classifier failed. Training aborts; there is no recovery path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainError {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("training split is empty ({total} rows, test fraction {test_fraction})")]
    EmptyTrainingSplit { total: usize, test_fraction: f64 },

    #[error("test fraction must be in [0, 1), got {0}")]
    InvalidTestFraction(f64),

    #[error("row {row} has {got} features, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("{rows} rows but {labels} labels")]
    LabelCount { rows: usize, labels: usize },

    #[error("training labels contain a single class '{0}'")]
    SingleClass(String),
}

/// The classifier rejected its input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("feature vector has length {got}, model expects {expected}")]
    FeatureLength { expected: usize, got: usize },

    #[error("model returned {got} probabilities for {expected} classes")]
    ClassCount { expected: usize, got: usize },

    #[error("model returned no distribution")]
    EmptyOutput,

    #[error("model returned a non-finite probability {value} for class '{class}'")]
    NonFinite { class: String, value: f64 },
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt model artifact: {0}")]
    Corrupt(String),
}

/// A prediction request failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// Rejected at the boundary, before encoding or inference.
    #[error("select at least one symptom")]
    EmptySelection,

    #[error(transparent)]
    Inference(#[from] InferenceError),
}
