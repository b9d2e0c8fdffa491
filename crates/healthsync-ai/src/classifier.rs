//! The capability shared by every model the inference service can run.

use crate::error::InferenceError;

/// A classifier that yields a probability distribution over known classes.
///
/// Implemented by the trained [`DecisionTree`](crate::DecisionTree) and by the
/// [`FallbackModel`](crate::FallbackModel) stand-in. Implementations are
/// immutable after construction, so a shared instance needs no locking.
pub trait ProbabilisticClassifier: Send + Sync {
    /// Class labels, in the order `predict_proba` reports them.
    fn classes(&self) -> &[String];

    /// One probability row per input vector, each row aligned to
    /// [`classes`](Self::classes).
    fn predict_proba(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, InferenceError>;
}
