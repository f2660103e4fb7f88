//! fraud-train - batch training job, synthetic data generator and rule checker

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fraud_core::constants::{
    APP_VERSION, DEFAULT_MAX_ITERATIONS, DEFAULT_MODEL_PATH, DEFAULT_OUTPUTS_DIR,
    DEFAULT_SPLIT_SEED, DEFAULT_SUSPICIOUS_REPORT_PATH, DEFAULT_SYNTHETIC_LABEL_COLUMN,
    DEFAULT_TRANSACTIONS_PATH, LABEL_COLUMN,
};
use fraud_core::logic::generator::{write_transactions_csv, GeneratorConfig};
use fraud_core::logic::training::SyntheticLabel;
use fraud_core::{run_check, run_training, TrainingConfig};

#[derive(Parser)]
#[command(name = "fraud-train")]
#[command(about = "Train the transaction fraud classifier", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the pipeline, write the model artifact and a run report
    Train {
        /// Labeled transaction CSV
        #[arg(long, env = "FRAUD_TRANSACTIONS_PATH", default_value = DEFAULT_TRANSACTIONS_PATH)]
        data: PathBuf,

        /// Artifact output path
        #[arg(long, env = "FRAUD_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Directory for model_run_*.txt reports
        #[arg(long, env = "FRAUD_OUTPUTS_DIR", default_value = DEFAULT_OUTPUTS_DIR)]
        outputs: PathBuf,

        /// Label column
        #[arg(long, env = "FRAUD_LABEL_COLUMN", default_value = LABEL_COLUMN)]
        label_column: String,

        /// Derive a missing label as `<synthetic-label-column> > THRESHOLD`
        #[arg(long)]
        synthetic_label_threshold: Option<f64>,

        /// Source column of the derived label
        #[arg(long, default_value = DEFAULT_SYNTHETIC_LABEL_COLUMN)]
        synthetic_label_column: String,

        /// Split seed
        #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
        seed: u64,

        /// Classifier iteration budget
        #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
        max_iterations: u64,
    },

    /// Write a synthetic transaction CSV
    Generate {
        /// Number of rows
        #[arg(long, default_value_t = 1000)]
        rows: usize,

        /// Output path
        #[arg(long, default_value = DEFAULT_TRANSACTIONS_PATH)]
        out: PathBuf,

        /// RNG seed
        #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
        seed: u64,
    },

    /// Score transactions with per-card rules and write the suspicious ones
    Check {
        /// Transaction CSV
        #[arg(long, env = "FRAUD_TRANSACTIONS_PATH", default_value = DEFAULT_TRANSACTIONS_PATH)]
        data: PathBuf,

        /// Report path
        #[arg(long, default_value = DEFAULT_SUSPICIOUS_REPORT_PATH)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("fraud-train v{}", APP_VERSION);

    match cli.command {
        Commands::Train {
            data,
            model,
            outputs,
            label_column,
            synthetic_label_threshold,
            synthetic_label_column,
            seed,
            max_iterations,
        } => {
            let mut config = TrainingConfig::new(data, model);
            config.outputs_dir = Some(outputs);
            config.label_column = label_column;
            config.seed = seed;
            config.max_iterations = max_iterations;
            config.synthetic_label = synthetic_label_threshold.map(|threshold| SyntheticLabel {
                column: synthetic_label_column,
                threshold,
            });

            let outcome = run_training(&config).with_context(|| {
                format!("training on {} failed", config.dataset_path.display())
            })?;

            print!("{}", outcome.report.render());
            if let Some(path) = &outcome.report_path {
                log::info!("Report: {}", path.display());
            }
        }
        Commands::Generate { rows, out, seed } => {
            let stats = write_transactions_csv(&GeneratorConfig::new(rows, seed), &out)
                .with_context(|| format!("writing {} failed", out.display()))?;
            println!(
                "{} generated with exactly {} transactions ({} flagged).",
                out.display(),
                stats.rows,
                stats.fraud_rows
            );
        }
        Commands::Check { data, out } => {
            let summary = run_check(&data, &out)
                .with_context(|| format!("checking {} failed", data.display()))?;
            print!("{}", std::fs::read_to_string(&out)?);
            println!(
                "\n{} of {} transactions flagged. Suspicious transactions saved to: {}",
                summary.flagged,
                summary.checked,
                out.display()
            );
        }
    }

    Ok(())
}
