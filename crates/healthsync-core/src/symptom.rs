//! Symptom selections and their display names.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The set of symptom identifiers a user marks present for one request.
///
/// Duplicates collapse and iteration is alphabetical, so two selections with
/// the same members are indistinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomSelection {
    symptoms: BTreeSet<String>,
}

impl SymptomSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symptom. Returns `false` if it was already selected.
    pub fn insert(&mut self, symptom: impl Into<String>) -> bool {
        self.symptoms.insert(symptom.into())
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms.contains(symptom)
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SymptomSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symptoms: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Human-readable form of a symptom identifier: `high_fever` → `High Fever`.
pub fn display_name(symptom: &str) -> String {
    symptom
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let sel = SymptomSelection::from_iter(["cough", "fever", "cough"]);
        assert_eq!(sel.len(), 2);
        assert!(sel.contains("cough"));
        assert!(sel.contains("fever"));
    }

    #[test]
    fn iteration_is_alphabetical() {
        let sel = SymptomSelection::from_iter(["nausea", "fatigue", "headache"]);
        let names: Vec<_> = sel.iter().collect();
        assert_eq!(names, vec!["fatigue", "headache", "nausea"]);
    }

    #[test]
    fn insert_reports_new_members() {
        let mut sel = SymptomSelection::new();
        assert!(sel.is_empty());
        assert!(sel.insert("dizziness"));
        assert!(!sel.insert("dizziness"));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn display_name_title_cases_words() {
        assert_eq!(display_name("high_fever"), "High Fever");
        assert_eq!(display_name("loss_of_taste"), "Loss Of Taste");
        assert_eq!(display_name("fatigue"), "Fatigue");
        assert_eq!(display_name("DRY_COUGH"), "Dry Cough");
    }

    #[test]
    fn display_name_skips_empty_segments() {
        assert_eq!(display_name("_runny__nose_"), "Runny Nose");
        assert_eq!(display_name(""), "");
    }
}
