mod display;
mod request;
mod train;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use healthsync_ai::{InferenceService, TrainConfig, TreeParams};
use healthsync_store::DEFAULT_LABEL;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "healthsync", version, about = "Symptom-based disease prediction")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a decision tree on a symptom CSV and write the model artifact
    Train {
        /// Training CSV with a header row and one 0/1 column per symptom
        #[arg(long, env = "HEALTHSYNC_DATA", default_value = "dataset.csv")]
        data: PathBuf,

        /// Name of the label column
        #[arg(long, default_value = DEFAULT_LABEL)]
        label: String,

        /// Where to write the artifact
        #[arg(long, env = "HEALTHSYNC_ARTIFACT", default_value = "model.json")]
        out: PathBuf,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value_t = 0.2)]
        test_fraction: f64,

        /// Shuffle seed for the train/test split
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Maximum tree depth (unbounded when omitted)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Evaluate on the held-out rows and store accuracy and F1 in the artifact
        #[arg(long)]
        with_metrics: bool,
    },

    /// List the symptom vocabulary
    Symptoms {
        #[arg(long, env = "HEALTHSYNC_ARTIFACT", default_value = "model.json")]
        artifact: PathBuf,
    },

    /// Predict likely diseases from selected symptoms
    Predict {
        /// Symptom identifiers, space or comma separated (e.g. high_fever,dry_cough)
        symptoms: Vec<String>,

        #[arg(long, env = "HEALTHSYNC_ARTIFACT", default_value = "model.json")]
        artifact: PathBuf,

        /// Acknowledge the medical disclaimer
        #[arg(long, env = "HEALTHSYNC_ACCEPT_DISCLAIMER")]
        accept_disclaimer: bool,

        /// Also write a plain-text clinical report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the diagnosis as JSON instead of a result card
        #[arg(long)]
        json: bool,
    },

    /// Show model source, size and recorded metrics
    Info {
        #[arg(long, env = "HEALTHSYNC_ARTIFACT", default_value = "model.json")]
        artifact: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let filter = if verbose > 0 {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("healthsync v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Train {
            data,
            label,
            out,
            test_fraction,
            seed,
            max_depth,
            with_metrics,
        } => {
            let config = TrainConfig {
                test_fraction,
                seed,
                tree: TreeParams {
                    max_depth,
                    ..TreeParams::default()
                },
            };
            eprintln!("Training on {}...", data.display());
            let stats = train::run_train_pipeline(&data, &label, &config, &out, with_metrics)?;
            eprintln!(
                "Wrote {} ({} rows: {} train / {} test, {} symptoms, {} diseases) in {:.1}s",
                out.display(),
                stats.total_rows,
                stats.train_rows,
                stats.test_rows,
                stats.features,
                stats.classes,
                stats.elapsed_secs
            );
            for (name, value) in &stats.metrics {
                eprintln!("  {name:<10} {value:.4}");
            }
        }

        Command::Symptoms { artifact } => {
            let service = InferenceService::shared(&artifact).context("loading model")?;
            display::print_symptoms(service);
        }

        Command::Predict {
            symptoms,
            artifact,
            accept_disclaimer,
            report,
            json,
        } => {
            request::require_consent(accept_disclaimer)?;
            let selection = request::parse_selection(&symptoms)?;

            let service = InferenceService::shared(&artifact).context("loading model")?;
            if let Some(warning) = request::unknown_warning(service.vocabulary(), &selection) {
                eprintln!("{warning}");
            }
            let diagnosis = service
                .predict(&selection)
                .context("running prediction")?;

            let now = chrono::Local::now();
            if json {
                println!("{}", serde_json::to_string_pretty(&diagnosis)?);
            } else {
                display::print_result_card(&diagnosis, now);
            }

            if let Some(path) = report {
                std::fs::write(&path, display::render_report(&diagnosis, now))
                    .with_context(|| format!("writing report {}", path.display()))?;
                eprintln!("Report written to {}", path.display());
            }
        }

        Command::Info { artifact } => {
            let service = InferenceService::shared(&artifact).context("loading model")?;
            display::print_model_info(service);
        }
    }

    Ok(())
}
