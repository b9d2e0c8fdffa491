//! CSV training data: read through Arrow, then resolve the feature schema.
//!
//! Column types are inferred from the whole file. Every numeric (or boolean, or
//! all-empty) column other than the label becomes a symptom feature in file
//! order; string columns are dropped. Empty cells in kept columns count as 0.

use std::fs::File;
use std::io::{ErrorKind, Seek};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Float64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use healthsync_core::{FeatureSchema, SchemaError};
use tracing::{debug, info};

use crate::StoreError;

/// Label column name used by convention.
pub const DEFAULT_LABEL: &str = "disease";

const CSV_BATCH_SIZE: usize = 4096;

/// Feature matrix and labels aligned to a resolved [`FeatureSchema`].
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub schema: FeatureSchema,
    /// One row per sample, `rows[r][i]` is the value of `schema[i]`.
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<String>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read a CSV file with a header row into Arrow batches.
///
/// Returns the inferred schema alongside the batches so that a header-only
/// file still reports its columns.
pub fn read_csv(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>), StoreError> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StoreError::CsvNotFound(path.to_path_buf()),
        _ => StoreError::Io(e),
    })?;
    let (schema, records) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(CSV_BATCH_SIZE)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    info!(
        records,
        columns = schema.fields().len(),
        path = %path.display(),
        "read training csv"
    );
    Ok((schema, batches))
}

/// Derive the feature schema and feature matrix from CSV batches.
pub fn resolve_features(
    schema: &Schema,
    batches: &[RecordBatch],
    label: &str,
) -> Result<TrainingSet, StoreError> {
    if schema.index_of(label).is_err() {
        return Err(SchemaError::MissingLabel(label.to_string()).into());
    }

    let mut feature_names = Vec::new();
    for field in schema.fields() {
        if field.name() == label {
            continue;
        }
        if is_feature_type(field.data_type()) {
            feature_names.push(field.name().clone());
        } else {
            debug!(column = %field.name(), data_type = %field.data_type(), "dropping non-numeric column");
        }
    }
    if feature_names.is_empty() {
        return Err(SchemaError::NoFeatures.into());
    }
    let features = FeatureSchema::new(feature_names)?;

    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for batch in batches {
        let offset = labels.len();
        let label_col = cast(column(batch, label)?.as_ref(), &DataType::Utf8)?;
        let label_col = label_col.as_string::<i32>();
        for row in 0..batch.num_rows() {
            if label_col.is_null(row) {
                return Err(SchemaError::NullLabel { row: offset + row }.into());
            }
            labels.push(label_col.value(row).to_string());
        }

        let mut batch_rows = vec![Vec::with_capacity(features.len()); batch.num_rows()];
        for name in features.iter() {
            let col = cast(column(batch, name)?.as_ref(), &DataType::Float64)?;
            let values = col.as_primitive::<Float64Type>();
            for (row, out) in batch_rows.iter_mut().enumerate() {
                // Missing means absent.
                let v = if values.is_null(row) { 0.0 } else { values.value(row) };
                out.push(v);
            }
        }
        rows.extend(batch_rows);
    }

    info!(
        rows = rows.len(),
        features = features.len(),
        dropped = schema.fields().len() - 1 - features.len(),
        "resolved feature schema"
    );
    Ok(TrainingSet {
        schema: features,
        rows,
        labels,
    })
}

fn is_feature_type(data_type: &DataType) -> bool {
    data_type.is_numeric() || matches!(data_type, DataType::Boolean | DataType::Null)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>, StoreError> {
    batch.column_by_name(name).ok_or_else(|| {
        StoreError::Arrow(arrow::error::ArrowError::SchemaError(format!(
            "batch is missing column '{name}'"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn load(contents: &str, label: &str) -> Result<TrainingSet, StoreError> {
        let f = write_csv(contents);
        let (schema, batches) = read_csv(f.path()).unwrap();
        resolve_features(&schema, &batches, label)
    }

    #[test]
    fn resolves_numeric_columns_in_file_order() {
        let set = load(
            "fever,cough,fatigue,disease\n1,0,1,Flu\n0,1,0,Cold\n1,1,1,Flu\n",
            DEFAULT_LABEL,
        )
        .unwrap();

        let names: Vec<_> = set.schema.iter().collect();
        assert_eq!(names, vec!["fever", "cough", "fatigue"]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.rows[0], vec![1.0, 0.0, 1.0]);
        assert_eq!(set.rows[1], vec![0.0, 1.0, 0.0]);
        assert_eq!(set.labels, vec!["Flu", "Cold", "Flu"]);
    }

    #[test]
    fn label_may_appear_anywhere() {
        let set = load("disease,fever,cough\nFlu,1,0\nCold,0,1\n", DEFAULT_LABEL).unwrap();
        let names: Vec<_> = set.schema.iter().collect();
        assert_eq!(names, vec!["fever", "cough"]);
        assert_eq!(set.rows[1], vec![0.0, 1.0]);
    }

    #[test]
    fn missing_label_is_schema_error() {
        let err = load("fever,cough\n1,0\n", DEFAULT_LABEL).unwrap_err();
        assert!(
            matches!(err, StoreError::Schema(SchemaError::MissingLabel(ref l)) if l == "disease"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn drops_string_columns() {
        let set = load(
            "patient,fever,notes,cough,disease\nann,1,mild,0,Flu\nbob,0,none,1,Cold\n",
            DEFAULT_LABEL,
        )
        .unwrap();
        let names: Vec<_> = set.schema.iter().collect();
        assert_eq!(names, vec!["fever", "cough"]);
        assert_eq!(set.rows[0], vec![1.0, 0.0]);
    }

    #[test]
    fn empty_cells_become_zero() {
        let set = load("fever,cough,disease\n1,,Flu\n,1,Cold\n", DEFAULT_LABEL).unwrap();
        assert_eq!(set.rows[0], vec![1.0, 0.0]);
        assert_eq!(set.rows[1], vec![0.0, 1.0]);
    }

    #[test]
    fn float_and_boolean_columns_are_features() {
        let set = load(
            "severity,smoker,disease\n0.5,true,Flu\n2.0,false,Cold\n",
            DEFAULT_LABEL,
        )
        .unwrap();
        assert_eq!(set.rows[0], vec![0.5, 1.0]);
        assert_eq!(set.rows[1], vec![2.0, 0.0]);
    }

    #[test]
    fn numeric_labels_become_strings() {
        let set = load("fever,code\n1,10\n0,20\n", "code").unwrap();
        assert_eq!(set.labels, vec!["10", "20"]);
    }

    #[test]
    fn missing_label_value_is_error() {
        let err = load("fever,disease\n1,Flu\n0,\n", DEFAULT_LABEL).unwrap_err();
        assert!(
            matches!(err, StoreError::Schema(SchemaError::NullLabel { row: 1 })),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn only_string_features_is_error() {
        let err = load("notes,disease\nmild,Flu\n", DEFAULT_LABEL).unwrap_err();
        assert!(matches!(err, StoreError::Schema(SchemaError::NoFeatures)));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let f = write_csv("fever,cough,disease\n");
        let (schema, batches) = read_csv(f.path()).unwrap();
        assert_eq!(schema.fields().len(), 3);
        assert!(batches.iter().all(|b| b.num_rows() == 0));
    }

    #[test]
    fn missing_file() {
        let err = read_csv(Path::new("/nonexistent/dataset.csv")).unwrap_err();
        assert!(matches!(err, StoreError::CsvNotFound(_)));
    }

    #[test]
    fn unreadable_path_is_io_error() {
        // A regular file used as a directory fails with something other than NotFound.
        let f = write_csv("fever,disease\n1,Flu\n");
        let err = read_csv(&f.path().join("dataset.csv")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)), "unexpected error: {err}");
    }
}
