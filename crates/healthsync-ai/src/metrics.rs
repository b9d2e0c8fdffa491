//! Held-out evaluation metrics.

use std::collections::BTreeMap;

/// Named metric values stored in a model artifact.
pub type Metrics = BTreeMap<String, f64>;

pub const ACCURACY: &str = "accuracy";
pub const F1_SCORE: &str = "f1_score";

/// Fraction of predictions equal to the truth. Empty input scores 0.
pub fn accuracy(truth: &[usize], predicted: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    correct as f64 / truth.len() as f64
}

/// Unweighted mean of per-class F1 over classes present in truth or predictions.
pub fn macro_f1(truth: &[usize], predicted: &[usize], n_classes: usize) -> f64 {
    let mut tp = vec![0usize; n_classes];
    let mut fp = vec![0usize; n_classes];
    let mut fn_ = vec![0usize; n_classes];

    for (&t, &p) in truth.iter().zip(predicted) {
        if t == p {
            tp[t] += 1;
        } else {
            fp[p] += 1;
            fn_[t] += 1;
        }
    }

    let mut total = 0.0;
    let mut seen = 0usize;
    for c in 0..n_classes {
        let support = tp[c] + fp[c] + fn_[c];
        if support == 0 {
            continue;
        }
        seen += 1;
        total += 2.0 * tp[c] as f64 / (2 * tp[c] + fp[c] + fn_[c]) as f64;
    }

    if seen == 0 { 0.0 } else { total / seen as f64 }
}
