//! Feature schema: the ordered symptom vocabulary that fixes vector layout.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::symptom::SymptomSelection;

/// Ordered, duplicate-free list of symptom identifiers.
///
/// Position `i` in a feature vector means "symptom `schema[i]` is present".
/// The order is fixed when the schema is resolved from training data and
/// travels with the model artifact, so training and inference always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema, rejecting duplicate identifiers.
    pub fn new(names: Vec<String>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateFeature(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// Number of features (the feature vector length).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a symptom in the schema.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Identifier at position `i`.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.names.get(i).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// Identifiers in alphabetical order, for pick lists.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        names
    }

    /// Selected symptoms that this schema does not know about, alphabetically.
    pub fn unknown<'a>(&self, selection: &'a SymptomSelection) -> Vec<&'a str> {
        selection.iter().filter(|s| !self.contains(s)).collect()
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.names
    }
}
