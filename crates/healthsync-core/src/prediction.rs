//! Ranked prediction results handed to the presentation layer.

use serde::{Deserialize, Serialize};

/// Maximum number of ranked predictions returned per request.
pub const TOP_K: usize = 5;

/// One ranked class with its predicted probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Probability fraction in `[0, 1]`.
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Confidence as a percentage, for display only.
    pub fn percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

/// Which model produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// A model artifact produced by the trainer.
    Trained,
    /// The synthetic stand-in used when no artifact exists.
    Fallback,
}

impl ModelSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trained => "trained",
            Self::Fallback => "fallback",
        }
    }
}

/// Outcome of one inference request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Sorted by confidence descending, at most [`TOP_K`] entries.
    pub predictions: Vec<Prediction>,
    /// Number of symptoms the user selected.
    pub symptom_count: usize,
    pub source: ModelSource,
}

impl Diagnosis {
    /// Highest-ranked prediction.
    pub fn primary(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    /// Sum of the returned confidences. Never exceeds 1 (plus rounding),
    /// and is usually below 1 because only the top classes are kept.
    pub fn returned_mass(&self) -> f64 {
        self.predictions.iter().map(|p| p.confidence).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnosis() -> Diagnosis {
        Diagnosis {
            predictions: vec![Prediction::new("Influenza", 0.6), Prediction::new("Migraine", 0.25)],
            symptom_count: 2,
            source: ModelSource::Trained,
        }
    }

    #[test]
    fn percent_scales_fraction() {
        let p = Prediction::new("Influenza", 0.734);
        assert!((p.percent() - 73.4).abs() < 1e-9);
    }

    #[test]
    fn primary_is_first() {
        let d = diagnosis();
        assert_eq!(d.primary().map(|p| p.label.as_str()), Some("Influenza"));
    }

    #[test]
    fn primary_of_empty_is_none() {
        let d = Diagnosis {
            predictions: vec![],
            symptom_count: 1,
            source: ModelSource::Fallback,
        };
        assert!(d.primary().is_none());
    }

    #[test]
    fn returned_mass_sums_confidences() {
        assert!((diagnosis().returned_mass() - 0.85).abs() < 1e-9);
    }

    #[test]
    fn source_serializes_lowercase() {
        let json = serde_json::to_string(&ModelSource::Fallback).unwrap();
        assert_eq!(json, r#""fallback""#);
        assert_eq!(ModelSource::Trained.as_str(), "trained");
    }
}
