//! One-shot training: deterministic train/test split, then a single tree fit.

use healthsync_store::TrainingSet;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::classifier::ProbabilisticClassifier;
use crate::error::{InferenceError, TrainError};
use crate::metrics::{self, Metrics};
use crate::tree::{DecisionTree, TreeParams};

/// Training configuration. The defaults reproduce the reference setup:
/// 20% held out, seed 42, a fully grown tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub test_fraction: f64,
    pub seed: u64,
    pub tree: TreeParams,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            tree: TreeParams::default(),
        }
    }
}

/// Row indices of each partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// A fitted model and the split it was trained on.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub model: DecisionTree,
    pub split: DataSplit,
}

/// Shuffle `0..n` with a seeded RNG and hold out `ceil(n * test_fraction)` rows.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<DataSplit, TrainError> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(TrainError::InvalidTestFraction(test_fraction));
    }
    if n == 0 {
        return Err(TrainError::EmptyDataset);
    }

    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test >= n {
        return Err(TrainError::EmptyTrainingSplit {
            total: n,
            test_fraction,
        });
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let train = order.split_off(n_test);
    Ok(DataSplit { train, test: order })
}

/// Split `set` and fit one tree on the training partition.
pub fn fit(set: &TrainingSet, config: &TrainConfig) -> Result<FittedModel, TrainError> {
    let split = train_test_split(set.len(), config.test_fraction, config.seed)?;

    let rows: Vec<Vec<f64>> = split.train.iter().map(|&i| set.rows[i].clone()).collect();
    let labels: Vec<&str> = split.train.iter().map(|&i| set.labels[i].as_str()).collect();
    let model = DecisionTree::fit(&rows, &labels, &config.tree)?;

    info!(
        train_rows = split.train.len(),
        test_rows = split.test.len(),
        nodes = model.node_count(),
        depth = model.depth(),
        "fitted decision tree"
    );
    Ok(FittedModel { model, split })
}

/// Accuracy and macro F1 of `model` on the given rows of `set`.
///
/// Labels the model never saw count as misses. No rows yields no metrics.
pub fn evaluate(
    model: &DecisionTree,
    set: &TrainingSet,
    rows: &[usize],
) -> Result<Metrics, InferenceError> {
    let mut out = Metrics::new();
    if rows.is_empty() {
        return Ok(out);
    }

    let batch: Vec<Vec<f64>> = rows.iter().map(|&i| set.rows[i].clone()).collect();
    let predicted = model.predict(&batch)?;

    let classes = model.classes();
    let unseen = classes.len();
    let truth: Vec<usize> = rows
        .iter()
        .map(|&i| {
            classes
                .iter()
                .position(|c| *c == set.labels[i])
                .unwrap_or(unseen)
        })
        .collect();

    out.insert(metrics::ACCURACY.into(), metrics::accuracy(&truth, &predicted));
    out.insert(
        metrics::F1_SCORE.into(),
        metrics::macro_f1(&truth, &predicted, unseen + 1),
    );
    Ok(out)
}
