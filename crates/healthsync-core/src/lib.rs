pub mod error;
pub mod prediction;
pub mod schema;
pub mod symptom;

pub use error::SchemaError;
pub use prediction::{Diagnosis, ModelSource, Prediction, TOP_K};
pub use schema::FeatureSchema;
pub use symptom::{SymptomSelection, display_name};
