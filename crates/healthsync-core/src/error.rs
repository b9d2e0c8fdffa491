use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("label column '{0}' not found in dataset")]
    MissingLabel(String),

    #[error("label column has no value at row {row}")]
    NullLabel { row: usize },

    #[error("dataset has no numeric feature columns")]
    NoFeatures,

    #[error("duplicate feature '{0}' in schema")]
    DuplicateFeature(String),
}
