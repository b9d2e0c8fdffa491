//! Disease labels: the sorted class index a model predicts over.

use std::collections::BTreeMap;

/// Sorted, distinct class labels. Position is the class id used inside models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassIndex {
    classes: Vec<String>,
}

/// Summary statistics for a label column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSummary {
    pub total: usize,
    pub distinct: usize,
    /// `(label, count)` sorted by count descending, then label.
    pub counts: Vec<(String, usize)>,
}

impl ClassIndex {
    /// Build the index from raw labels; duplicates collapse, order is lexical.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut classes: Vec<String> = labels.iter().map(|s| s.as_ref().to_string()).collect();
        classes.sort_unstable();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    /// Map labels to class ids. Labels outside the index map to `None`.
    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Vec<Option<usize>> {
        labels.iter().map(|l| self.index_of(l.as_ref())).collect()
    }

    pub fn into_classes(self) -> Vec<String> {
        self.classes
    }
}

/// Count occurrences of each label.
pub fn summarize<S: AsRef<str>>(labels: &[S]) -> LabelSummary {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label.as_ref()).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, n)| (label.to_string(), n))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    LabelSummary {
        total: labels.len(),
        distinct: counts.len(),
        counts,
    }
}
