//! Training data layer: CSV ingestion through Arrow and feature schema resolution.

mod dataset;
mod error;

pub use dataset::{DEFAULT_LABEL, TrainingSet, read_csv, resolve_features};
pub use error::StoreError;
