use healthsync_core::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("csv file not found: {0}")]
    CsvNotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
