//! Symptom classifier: CART training, artifact persistence, and ranked inference.

mod artifact;
mod classifier;
mod encoder;
mod error;
mod fallback;
mod labels;
pub mod metrics;
mod predictor;
mod service;
pub mod trainer;
mod tree;

pub use artifact::ModelArtifact;
pub use classifier::ProbabilisticClassifier;
pub use encoder::encode;
pub use error::{ArtifactError, InferenceError, PredictError, TrainError};
pub use fallback::{FALLBACK_CLASSES, FALLBACK_SYMPTOMS, FallbackModel, SeedFn, vector_seed};
pub use labels::{ClassIndex, LabelSummary, summarize};
pub use metrics::Metrics;
pub use predictor::Predictor;
pub use service::InferenceService;
pub use trainer::{DataSplit, FittedModel, TrainConfig};
pub use tree::{DecisionTree, Node, TreeParams};
