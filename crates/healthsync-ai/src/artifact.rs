//! Model artifact: the trained tree, its feature schema, and optional metrics.
//!
//! Stored as one JSON document. The artifact is written once by the trainer
//! and only read afterwards.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use healthsync_core::FeatureSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ArtifactError;
use crate::metrics::Metrics;
use crate::tree::DecisionTree;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model: DecisionTree,
    pub features: FeatureSchema,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
}

impl ModelArtifact {
    /// Bundle a fitted tree with the schema it was trained on.
    pub fn new(model: DecisionTree, features: FeatureSchema) -> Result<Self, ArtifactError> {
        let artifact = Self {
            model,
            features,
            metrics: Metrics::new(),
            trained_at: Some(Utc::now()),
        };
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Check that the tree and schema agree and the tree is well formed.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.model.n_features() != self.features.len() {
            return Err(ArtifactError::Corrupt(format!(
                "model expects {} features, schema has {}",
                self.model.n_features(),
                self.features.len()
            )));
        }
        self.model.check_integrity().map_err(ArtifactError::Corrupt)
    }

    /// Write the artifact as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!(
            path = %path.display(),
            features = self.features.len(),
            nodes = self.model.node_count(),
            "saved model artifact"
        );
        Ok(())
    }

    /// Read and validate an artifact.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ArtifactError::NotFound(path.to_path_buf()),
            _ => ArtifactError::Io(e),
        })?;
        let reader = BufReader::new(file);
        let artifact: Self = serde_json::from_reader(reader)?;
        artifact.validate()?;
        info!(
            path = %path.display(),
            features = artifact.features.len(),
            "loaded model artifact"
        );
        Ok(artifact)
    }
}
