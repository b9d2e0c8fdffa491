//! Training pipeline: read CSV → resolve features → fit tree → write artifact.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use healthsync_ai::{ModelArtifact, ProbabilisticClassifier, TrainConfig, summarize, trainer};

/// Number of label counts echoed to the terminal.
const SHOW_CLASSES: usize = 10;

#[derive(Debug)]
pub struct TrainStats {
    pub total_rows: usize,
    pub features: usize,
    pub classes: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub metrics: healthsync_ai::Metrics,
    pub elapsed_secs: f64,
}

/// Run the full training pipeline and write the artifact to `out`.
///
/// Metrics on the held-out rows are computed and stored only when
/// `with_metrics` is set.
pub fn run_train_pipeline(
    data: &Path,
    label: &str,
    config: &TrainConfig,
    out: &Path,
    with_metrics: bool,
) -> anyhow::Result<TrainStats> {
    let start = Instant::now();

    // 1. Read and resolve the dataset.
    let (schema, batches) = healthsync_store::read_csv(data)
        .with_context(|| format!("reading training data {}", data.display()))?;
    let set = healthsync_store::resolve_features(&schema, &batches, label)
        .context("resolving feature columns")?;
    eprintln!(
        "  Read {} rows, {} symptom columns from {}",
        set.len(),
        set.schema.len(),
        data.display()
    );

    let summary = summarize(&set.labels);
    eprintln!("  {} distinct diseases", summary.distinct);
    for (disease, n) in summary.counts.iter().take(SHOW_CLASSES) {
        eprintln!("    {disease:<30} {n}");
    }
    if summary.distinct > SHOW_CLASSES {
        eprintln!("    ... and {} more", summary.distinct - SHOW_CLASSES);
    }

    // 2. Split and fit.
    let fitted = trainer::fit(&set, config).context("fitting decision tree")?;
    eprintln!(
        "  Fitted tree: {} nodes, depth {}",
        fitted.model.node_count(),
        fitted.model.depth()
    );

    // 3. Optional held-out evaluation.
    let metrics = if with_metrics {
        trainer::evaluate(&fitted.model, &set, &fitted.split.test)
            .context("evaluating on held-out rows")?
    } else {
        healthsync_ai::Metrics::new()
    };

    // 4. Persist.
    let classes = fitted.model.classes().len();
    let artifact = ModelArtifact::new(fitted.model, set.schema.clone())
        .context("bundling model artifact")?
        .with_metrics(metrics.clone());
    artifact
        .save(out)
        .with_context(|| format!("writing artifact {}", out.display()))?;

    Ok(TrainStats {
        total_rows: set.len(),
        features: set.schema.len(),
        classes,
        train_rows: fitted.split.train.len(),
        test_rows: fitted.split.test.len(),
        metrics,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}
