//! Symptom Checker Trainer CLI
//!
//! Deterministic offline trainer producing the classifier and label-encoder
//! artifacts consumed by `symptom-checker`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use symptom_trainer::{train_and_save, TrainerConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "symptom-train")]
#[command(author = "Symptom Checker Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic random-forest trainer for the symptom checker", long_about = None)]
struct Args {
    /// TOML configuration file (flags below override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV dataset path (header row, 0/1 symptom columns, outcome column)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Name of the outcome column
    #[arg(long)]
    outcome_column: Option<String>,

    /// Output path of the classifier artifact
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// Output path of the label-encoder artifact
    #[arg(long)]
    encoder_out: Option<PathBuf>,

    /// Number of trees in the forest
    #[arg(long)]
    trees: Option<usize>,

    /// Maximum tree depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Minimum samples per leaf
    #[arg(long)]
    min_samples_leaf: Option<usize>,

    /// Features tried per split (default: ceil(sqrt(symptom count)))
    #[arg(long)]
    max_features: Option<usize>,

    /// Random seed for the split, bootstraps and feature sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Train every tree on the full training partition
    #[arg(long)]
    no_bootstrap: bool,

    /// Write the resolved configuration to this TOML file before training
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> Result<TrainerConfig> {
        let mut config = match &self.config {
            Some(path) => TrainerConfig::load_from_file(path)?,
            None => TrainerConfig::default(),
        };

        if let Some(input) = &self.input {
            config.dataset_path = input.clone();
        }
        if let Some(column) = &self.outcome_column {
            config.outcome_column = column.clone();
        }
        if let Some(path) = &self.model_out {
            config.artifacts.model = path.clone();
        }
        if let Some(path) = &self.encoder_out {
            config.artifacts.encoder = path.clone();
        }
        if let Some(trees) = self.trees {
            config.forest.num_trees = trees;
        }
        if let Some(depth) = self.max_depth {
            config.forest.max_depth = depth;
        }
        if let Some(leaf) = self.min_samples_leaf {
            config.forest.min_samples_leaf = leaf;
        }
        if self.max_features.is_some() {
            config.forest.max_features = self.max_features;
        }
        if let Some(seed) = self.seed {
            config.forest.seed = seed;
        }
        if self.no_bootstrap {
            config.forest.bootstrap = false;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose { "debug" } else { "info" };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Symptom Checker Forest Trainer v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════");

    let config = args.to_config()?;
    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        info!("Configuration written to: {}", path.display());
    }

    info!("Training configuration:");
    info!("  Trees: {}", config.forest.num_trees);
    info!("  Max depth: {}", config.forest.max_depth);
    info!("  Min samples per leaf: {}", config.forest.min_samples_leaf);
    match config.forest.max_features {
        Some(k) => info!("  Features per split: {}", k),
        None => info!("  Features per split: ceil(sqrt(symptoms))"),
    }
    info!("  Bootstrap: {}", config.forest.bootstrap);
    info!("  Seed: {}", config.forest.seed);

    info!("═══════════════════════════════════════════");
    info!("Starting training...");
    let (outcome, digests) = train_and_save(&config).context("Training failed")?;

    let metadata = &outcome.model.metadata;
    info!("Training complete!");
    info!("  Trees: {}", outcome.model.num_trees());
    info!("  Classes: {}", outcome.encoder.len());
    info!(
        "  Held-out accuracy: {}/{} ({:.2}%)",
        outcome.holdout_correct,
        metadata.test_rows,
        f64::from(metadata.holdout_accuracy_ppm) / 10_000.0
    );
    info!("  Model hash: {}", metadata.model_hash);

    info!("═══════════════════════════════════════════");
    info!("✓ Training completed successfully");
    info!("  Model: {} ({})", config.artifacts.model.display(), digests.model);
    info!(
        "  Encoder: {} ({})",
        config.artifacts.encoder.display(),
        digests.encoder
    );

    Ok(())
}
