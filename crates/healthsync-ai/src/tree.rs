//! CART decision tree over symptom indicator vectors.
//!
//! Splits minimise weighted Gini impurity. Features are scanned in schema
//! order and candidate thresholds are midpoints between adjacent distinct
//! values; a later candidate replaces the incumbent only when strictly better,
//! so the same data always grows the same tree. Leaves store the class
//! distribution of their training samples, which is what `predict_proba`
//! returns.

use serde::{Deserialize, Serialize};

use crate::classifier::ProbabilisticClassifier;
use crate::error::{InferenceError, TrainError};
use crate::labels::ClassIndex;

/// Minimum impurity decrease for a split to be kept.
const MIN_IMPURITY_DECREASE: f64 = 1e-12;

/// Fixed hyperparameters. The defaults grow a fully expanded tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or cannot be split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// One node in the flattened tree. Children always sit after their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        /// Probability per class, aligned to [`DecisionTree::classes`].
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        /// Samples with `x[feature] <= threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted decision tree classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    classes: Vec<String>,
    n_features: usize,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Fit a tree on `rows` (one feature vector per sample) and their labels.
    pub fn fit<S: AsRef<str>>(
        rows: &[Vec<f64>],
        labels: &[S],
        params: &TreeParams,
    ) -> Result<Self, TrainError> {
        if rows.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        if rows.len() != labels.len() {
            return Err(TrainError::LabelCount {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        let n_features = rows[0].len();
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(TrainError::RaggedRows {
                row,
                expected: n_features,
                got: r.len(),
            });
        }

        let index = ClassIndex::from_labels(labels);
        if index.len() < 2 {
            return Err(TrainError::SingleClass(labels[0].as_ref().to_string()));
        }
        // Every label is in the index it was built from.
        let y: Vec<usize> = index.encode(labels).into_iter().flatten().collect();

        let mut builder = Builder {
            rows,
            y: &y,
            n_classes: index.len(),
            n_features,
            params,
            nodes: Vec::new(),
        };
        builder.grow((0..rows.len()).collect(), 0);

        Ok(Self {
            classes: index.into_classes(),
            n_features,
            nodes: builder.nodes,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((id, d)) = stack.pop() {
            match self.nodes.get(id) {
                Some(Node::Split { left, right, .. }) => {
                    stack.push((*left, d + 1));
                    stack.push((*right, d + 1));
                }
                Some(Node::Leaf { .. }) => max = max.max(d),
                None => {}
            }
        }
        max
    }

    /// Most probable class id per row; ties go to the lower id.
    pub fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<usize>, InferenceError> {
        batch
            .iter()
            .map(|x| self.leaf(x).map(argmax))
            .collect()
    }

    /// Structural checks for a tree read from disk.
    pub fn check_integrity(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("tree has no classes".into());
        }
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        let len = self.nodes.len();
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } => {
                    if distribution.len() != self.classes.len() {
                        return Err(format!(
                            "leaf {id} has {} probabilities for {} classes",
                            distribution.len(),
                            self.classes.len()
                        ));
                    }
                    if distribution.iter().any(|p| !p.is_finite() || *p < 0.0) {
                        return Err(format!("leaf {id} has an invalid probability"));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= self.n_features {
                        return Err(format!(
                            "split {id} uses feature {feature}, tree has {}",
                            self.n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("split {id} has a NaN threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= len {
                            return Err(format!("split {id} has invalid child {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf(&self, x: &[f64]) -> Result<&[f64], InferenceError> {
        if x.len() != self.n_features {
            return Err(InferenceError::FeatureLength {
                expected: self.n_features,
                got: x.len(),
            });
        }
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Leaf { distribution }) => return Ok(distribution),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    id = if x[*feature] <= *threshold { *left } else { *right };
                }
                None => return Err(InferenceError::EmptyOutput),
            }
        }
    }
}

impl ProbabilisticClassifier for DecisionTree {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, InferenceError> {
        batch
            .iter()
            .map(|x| self.leaf(x).map(<[f64]>::to_vec))
            .collect()
    }
}

// ── Growing ──

struct Builder<'a> {
    rows: &'a [Vec<f64>],
    y: &'a [usize],
    n_classes: usize,
    n_features: usize,
    params: &'a TreeParams,
    nodes: Vec<Node>,
}

struct Split {
    feature: usize,
    threshold: f64,
}

impl Builder<'_> {
    /// Grow the subtree for `samples` and return its root id.
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&samples);
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: distribution(&counts, samples.len()),
        });

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if pure || depth_reached || samples.len() < self.params.min_samples_split {
            return id;
        }

        let Some(split) = self.best_split(&samples, &counts) else {
            return id;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&s| self.rows[s][split.feature] <= split.threshold);
        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);

        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &s in samples {
            counts[self.y[s]] += 1;
        }
        counts
    }

    fn best_split(&self, samples: &[usize], counts: &[usize]) -> Option<Split> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let mut best_impurity = gini(counts, n) - MIN_IMPURITY_DECREASE;
        let mut best = None;

        let mut order = samples.to_vec();
        for feature in 0..self.n_features {
            order.sort_by(|&a, &b| self.rows[a][feature].total_cmp(&self.rows[b][feature]));

            let mut left = vec![0usize; self.n_classes];
            let mut right = counts.to_vec();
            for pos in 0..n - 1 {
                let class = self.y[order[pos]];
                left[class] += 1;
                right[class] -= 1;

                let value = self.rows[order[pos]][feature];
                let next = self.rows[order[pos + 1]][feature];
                if value >= next {
                    continue;
                }
                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let impurity = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini(&right, n_right))
                    / n as f64;
                if impurity < best_impurity {
                    best_impurity = impurity;
                    let mut threshold = value / 2.0 + next / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(Split { feature, threshold });
                }
            }
        }
        best
    }
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

fn distribution(counts: &[usize], n: usize) -> Vec<f64> {
    counts
        .iter()
        .map(|&c| if n == 0 { 0.0 } else { c as f64 / n as f64 })
        .collect()
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
