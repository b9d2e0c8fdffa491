//! Ranked, bounded predictions from a probabilistic classifier.

use std::sync::Arc;

use healthsync_core::{Prediction, TOP_K};

use crate::classifier::ProbabilisticClassifier;
use crate::error::InferenceError;

/// Wraps a classifier and turns its distribution into the top-K classes.
#[derive(Clone)]
pub struct Predictor {
    classifier: Arc<dyn ProbabilisticClassifier>,
    top_k: usize,
}

impl Predictor {
    pub fn new(classifier: Arc<dyn ProbabilisticClassifier>) -> Self {
        Self::with_top_k(classifier, TOP_K)
    }

    pub fn with_top_k(classifier: Arc<dyn ProbabilisticClassifier>, top_k: usize) -> Self {
        Self { classifier, top_k }
    }

    pub fn classifier(&self) -> &dyn ProbabilisticClassifier {
        self.classifier.as_ref()
    }

    /// Rank classes for one feature vector, highest confidence first.
    ///
    /// The sort is stable: exact ties keep the classifier's class order.
    /// A NaN or infinite probability is rejected rather than ranked.
    pub fn rank(&self, vector: &[f64]) -> Result<Vec<Prediction>, InferenceError> {
        let classes = self.classifier.classes();
        let probs = self
            .classifier
            .predict_proba(&[vector.to_vec()])?
            .into_iter()
            .next()
            .ok_or(InferenceError::EmptyOutput)?;
        if probs.len() != classes.len() {
            return Err(InferenceError::ClassCount {
                expected: classes.len(),
                got: probs.len(),
            });
        }

        if let Some((class, &value)) = classes.iter().zip(&probs).find(|(_, p)| !p.is_finite()) {
            return Err(InferenceError::NonFinite {
                class: class.clone(),
                value,
            });
        }

        let mut ranked: Vec<Prediction> = classes
            .iter()
            .zip(probs)
            .map(|(label, p)| Prediction::new(label.clone(), p))
            .collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked.truncate(self.top_k);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a fixed distribution regardless of input.
    struct Fixed {
        classes: Vec<String>,
        probs: Vec<f64>,
        n_features: usize,
    }

    impl Fixed {
        fn new(pairs: &[(&str, f64)]) -> Self {
            Self {
                classes: pairs.iter().map(|(c, _)| c.to_string()).collect(),
                probs: pairs.iter().map(|(_, p)| *p).collect(),
                n_features: 3,
            }
        }
    }

    impl ProbabilisticClassifier for Fixed {
        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict_proba(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, InferenceError> {
            batch
                .iter()
                .map(|x| {
                    if x.len() == self.n_features {
                        Ok(self.probs.clone())
                    } else {
                        Err(InferenceError::FeatureLength {
                            expected: self.n_features,
                            got: x.len(),
                        })
                    }
                })
                .collect()
        }
    }

    fn predictor(pairs: &[(&str, f64)]) -> Predictor {
        Predictor::new(Arc::new(Fixed::new(pairs)))
    }

    fn labels(ranked: &[Prediction]) -> Vec<&str> {
        ranked.iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn ranks_three_classes() {
        let p = predictor(&[("A", 0.7), ("B", 0.2), ("C", 0.1)]);
        let ranked = p.rank(&[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(
            ranked,
            vec![
                Prediction::new("A", 0.7),
                Prediction::new("B", 0.2),
                Prediction::new("C", 0.1),
            ]
        );
    }

    #[test]
    fn sorts_descending() {
        let p = predictor(&[("A", 0.1), ("B", 0.6), ("C", 0.3)]);
        let ranked = p.rank(&[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(labels(&ranked), vec!["B", "C", "A"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn truncates_to_five() {
        let pairs: Vec<(String, f64)> = (0..8).map(|i| (format!("D{i}"), (i + 1) as f64 / 36.0)).collect();
        let pairs: Vec<(&str, f64)> = pairs.iter().map(|(l, p)| (l.as_str(), *p)).collect();
        let ranked = predictor(&pairs).rank(&[0.0, 0.0, 1.0]).unwrap();
        assert_eq!(ranked.len(), TOP_K);
        assert_eq!(labels(&ranked), vec!["D7", "D6", "D5", "D4", "D3"]);
        assert!(ranked.iter().map(|p| p.confidence).sum::<f64>() <= 1.0);
    }

    #[test]
    fn fewer_classes_than_k() {
        let ranked = predictor(&[("A", 0.4), ("B", 0.6)]).rank(&[0.0; 3]).unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn ties_keep_class_order() {
        let p = predictor(&[("C", 0.25), ("A", 0.25), ("B", 0.5), ("D", 0.0)]);
        let ranked = p.rank(&[0.0; 3]).unwrap();
        assert_eq!(labels(&ranked), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let p = predictor(&[("A", 0.3), ("B", 0.3), ("C", 0.4)]);
        let v = [1.0, 1.0, 0.0];
        assert_eq!(p.rank(&v).unwrap(), p.rank(&v).unwrap());
    }

    #[test]
    fn custom_top_k() {
        let p = Predictor::with_top_k(Arc::new(Fixed::new(&[("A", 0.5), ("B", 0.3), ("C", 0.2)])), 1);
        assert_eq!(labels(&p.rank(&[0.0; 3]).unwrap()), vec!["A"]);
    }

    #[test]
    fn wrong_length_propagates() {
        let err = predictor(&[("A", 1.0)]).rank(&[1.0]).unwrap_err();
        assert_eq!(err, InferenceError::FeatureLength { expected: 3, got: 1 });
    }

    #[test]
    fn nan_probability_is_rejected() {
        let pairs: Vec<(String, f64)> = (0..40)
            .map(|i| {
                let p = if i % 7 == 3 { f64::NAN } else { i as f64 / 100.0 };
                (format!("D{i}"), p)
            })
            .collect();
        let pairs: Vec<(&str, f64)> = pairs.iter().map(|(l, p)| (l.as_str(), *p)).collect();
        let err = predictor(&pairs).rank(&[0.0; 3]).unwrap_err();
        assert!(
            matches!(err, InferenceError::NonFinite { ref class, .. } if class == "D3"),
            "got {err}"
        );
    }

    #[test]
    fn infinite_probability_is_rejected() {
        let err = predictor(&[("A", 0.5), ("B", f64::INFINITY)])
            .rank(&[0.0; 3])
            .unwrap_err();
        assert!(matches!(err, InferenceError::NonFinite { ref class, .. } if class == "B"));
    }

    #[test]
    fn mismatched_distribution_is_error() {
        let mut fixed = Fixed::new(&[("A", 0.5), ("B", 0.5)]);
        fixed.probs.pop();
        let err = Predictor::new(Arc::new(fixed)).rank(&[0.0; 3]).unwrap_err();
        assert_eq!(err, InferenceError::ClassCount { expected: 2, got: 1 });
    }
}
