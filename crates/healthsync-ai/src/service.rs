//! Inference service: a loaded model, its vocabulary, and the request path.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use healthsync_core::{Diagnosis, FeatureSchema, ModelSource, SymptomSelection};
use tracing::{debug, info, warn};

use crate::artifact::ModelArtifact;
use crate::classifier::ProbabilisticClassifier;
use crate::encoder::encode;
use crate::error::{ArtifactError, PredictError};
use crate::fallback::FallbackModel;
use crate::metrics::Metrics;
use crate::predictor::Predictor;

static SHARED: OnceLock<InferenceService> = OnceLock::new();

/// A model ready to answer prediction requests.
///
/// Immutable once built. [`shared`](Self::shared) keeps one instance for the
/// whole process; tests build their own with [`new`](Self::new).
pub struct InferenceService {
    predictor: Predictor,
    schema: FeatureSchema,
    metrics: Metrics,
    source: ModelSource,
}

impl InferenceService {
    pub fn new(
        classifier: Arc<dyn ProbabilisticClassifier>,
        schema: FeatureSchema,
        metrics: Metrics,
        source: ModelSource,
    ) -> Self {
        Self {
            predictor: Predictor::new(classifier),
            schema,
            metrics,
            source,
        }
    }

    /// Serve a trained artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        let ModelArtifact {
            model,
            features,
            metrics,
            ..
        } = artifact;
        Self::new(Arc::new(model), features, metrics, ModelSource::Trained)
    }

    /// Serve the demo stand-in.
    pub fn fallback() -> Result<Self, ArtifactError> {
        let schema = FallbackModel::schema().map_err(|e| ArtifactError::Corrupt(e.to_string()))?;
        Ok(Self::new(
            Arc::new(FallbackModel::new()),
            schema,
            FallbackModel::metrics(),
            ModelSource::Fallback,
        ))
    }

    /// Load the artifact at `path`, or fall back to the demo model if it is absent.
    ///
    /// Only a missing file triggers the fallback; an unreadable or corrupt
    /// artifact is an error.
    pub fn load_or_fallback(path: &Path) -> Result<Self, ArtifactError> {
        match ModelArtifact::load(path) {
            Ok(artifact) => Ok(Self::from_artifact(artifact)),
            Err(ArtifactError::NotFound(_)) => {
                warn!(path = %path.display(), "model artifact not found, using fallback model");
                Self::fallback()
            }
            Err(e) => Err(e),
        }
    }

    /// Process-wide service, initialised from `path` on first use.
    ///
    /// Later calls return the same instance and ignore `path`.
    pub fn shared(path: &Path) -> Result<&'static Self, ArtifactError> {
        if let Some(service) = SHARED.get() {
            return Ok(service);
        }
        let service = Self::load_or_fallback(path)?;
        Ok(SHARED.get_or_init(|| service))
    }

    pub fn source(&self) -> ModelSource {
        self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ModelSource::Fallback
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn classes(&self) -> &[String] {
        self.predictor.classifier().classes()
    }

    /// Symptom vocabulary in feature order.
    pub fn vocabulary(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Symptom vocabulary in alphabetical order, for pick lists.
    pub fn sorted_vocabulary(&self) -> Vec<&str> {
        self.schema.sorted()
    }

    /// Rank diseases for a set of selected symptoms.
    ///
    /// An empty selection is rejected before anything reaches the model.
    /// Symptoms outside the vocabulary are ignored.
    pub fn predict(&self, selection: &SymptomSelection) -> Result<Diagnosis, PredictError> {
        if selection.is_empty() {
            return Err(PredictError::EmptySelection);
        }

        let unknown = self.schema.unknown(selection);
        if !unknown.is_empty() {
            debug!(?unknown, "ignoring symptoms outside the vocabulary");
        }

        let vector = encode(&self.schema, selection);
        let predictions = self.predictor.rank(&vector)?;
        info!(
            symptoms = selection.len(),
            source = self.source.as_str(),
            top = predictions.first().map(|p| p.label.as_str()).unwrap_or(""),
            "prediction complete"
        );

        Ok(Diagnosis {
            predictions,
            symptom_count: selection.len(),
            source: self.source,
        })
    }
}
