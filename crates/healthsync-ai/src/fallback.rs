//! Demo stand-in used when no trained artifact exists.
//!
//! Produces a flat-Dirichlet distribution over five fixed diseases from a
//! ChaCha RNG seeded by the input vector. It has no predictive value; it only
//! keeps the front end usable and returns the same answer for the same input.

use healthsync_core::{FeatureSchema, SchemaError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::classifier::ProbabilisticClassifier;
use crate::error::InferenceError;
use crate::metrics::{self, Metrics};

pub const FALLBACK_CLASSES: [&str; 5] = [
    "Viral Sinusitis",
    "Influenza",
    "Migraine",
    "Acute Bronchitis",
    "Allergic Rhinitis",
];

/// Fallback vocabulary, alphabetical.
pub const FALLBACK_SYMPTOMS: [&str; 14] = [
    "abdominal_pain",
    "chest_tightness",
    "dizziness",
    "dry_cough",
    "fatigue",
    "headache",
    "high_fever",
    "joint_pain",
    "loss_of_taste",
    "muscle_pain",
    "nausea",
    "runny_nose",
    "skin_rash",
    "sore_throat",
];

/// Seed used for a vector with no symptoms set.
const EMPTY_SEED: u64 = 42;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Maps a feature vector to an RNG seed.
pub type SeedFn = fn(&[f64]) -> u64;

/// FNV-1a over the positions of non-zero entries.
pub fn vector_seed(vector: &[f64]) -> u64 {
    let mut hash = FNV_OFFSET;
    let mut any = false;
    for (i, _) in vector.iter().enumerate().filter(|(_, v)| **v != 0.0) {
        any = true;
        for byte in (i as u64).to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    if any { hash } else { EMPTY_SEED }
}

pub struct FallbackModel {
    classes: Vec<String>,
    n_features: usize,
    seed: SeedFn,
}

impl Default for FallbackModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackModel {
    pub fn new() -> Self {
        Self::with_seed(vector_seed)
    }

    /// Use a custom seeding function.
    pub fn with_seed(seed: SeedFn) -> Self {
        Self {
            classes: FALLBACK_CLASSES.iter().map(|c| c.to_string()).collect(),
            n_features: FALLBACK_SYMPTOMS.len(),
            seed,
        }
    }

    /// The fixed fallback vocabulary as a feature schema.
    pub fn schema() -> Result<FeatureSchema, SchemaError> {
        FeatureSchema::new(FALLBACK_SYMPTOMS.iter().map(|s| s.to_string()).collect())
    }

    /// Placeholder metrics shown for the demo model.
    pub fn metrics() -> Metrics {
        Metrics::from([
            (metrics::ACCURACY.to_string(), 0.96),
            (metrics::F1_SCORE.to_string(), 0.94),
        ])
    }

    fn distribution(&self, vector: &[f64]) -> Vec<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64((self.seed)(vector));
        // Normalised unit exponentials are a Dirichlet(1, ..., 1) sample.
        let draws: Vec<f64> = self
            .classes
            .iter()
            .map(|_| -(1.0 - rng.random::<f64>()).ln())
            .collect();
        let total: f64 = draws.iter().sum();
        if total > 0.0 {
            draws.into_iter().map(|d| d / total).collect()
        } else {
            vec![1.0 / self.classes.len() as f64; self.classes.len()]
        }
    }
}

impl ProbabilisticClassifier for FallbackModel {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, InferenceError> {
        batch
            .iter()
            .map(|x| {
                if x.len() != self.n_features {
                    return Err(InferenceError::FeatureLength {
                        expected: self.n_features,
                        got: x.len(),
                    });
                }
                Ok(self.distribution(x))
            })
            .collect()
    }
}
