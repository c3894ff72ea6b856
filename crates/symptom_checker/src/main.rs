//! Symptom Checker CLI
//!
//! Turns a free-text symptom description into a predicted disease and a
//! recommended specialist, printed as a JSON case report.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use symptom_core::{CheckerConfig, Predictor};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const USAGE: &str = "Usage: symptom-checker '<symptoms_text>'";

#[derive(Parser, Debug)]
#[command(name = "symptom-checker")]
#[command(author = "Symptom Checker Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Predict a disease and specialist from described symptoms", long_about = None)]
struct Args {
    /// Free-text symptom description (quote it; may start with '-')
    #[arg(allow_hyphen_values = true)]
    symptoms: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Classifier artifact path
    #[arg(long)]
    model: Option<PathBuf>,

    /// Label-encoder artifact path
    #[arg(long)]
    encoder: Option<PathBuf>,

    /// TOML file extending the built-in specialist table
    #[arg(long)]
    specialists: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (logs go to stderr)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Defaults, then config file, then environment, then flags
    fn resolve_config(&self) -> Result<CheckerConfig> {
        let mut config = match &self.config {
            Some(path) => CheckerConfig::load_from_file(path)?,
            None => CheckerConfig::default(),
        };
        config.apply_env();

        if let Some(path) = &self.model {
            config.artifacts.model = path.clone();
        }
        if let Some(path) = &self.encoder {
            config.artifacts.encoder = path.clone();
        }
        if let Some(path) = &self.specialists {
            config.specialists_path = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }

        Ok(config)
    }
}

fn init_logging(level: &str) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn run(args: &Args, symptoms: &str) -> Result<()> {
    let config = args.resolve_config()?;
    init_logging(&config.log_level)?;
    debug!("Resolved configuration: {:?}", config);

    let specialists = config.specialist_table()?;
    debug!(
        "Specialist table: {} entries, default {:?}",
        specialists.len(),
        specialists.default_specialist()
    );
    let predictor = Predictor::load(&config.artifacts, specialists)?;

    let report = predictor.predict(symptoms)?;
    println!("{}", report.to_pretty_json()?);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(symptoms) = args.symptoms.as_deref() else {
        println!("{USAGE}");
        return ExitCode::FAILURE;
    };

    match run(&args, symptoms) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_positional() {
        let args = Args::parse_from(["symptom-checker", "itching and skin rash"]);
        assert_eq!(args.symptoms.as_deref(), Some("itching and skin rash"));

        let args = Args::parse_from(["symptom-checker"]);
        assert!(args.symptoms.is_none());

        let args = Args::parse_from(["symptom-checker", ""]);
        assert_eq!(args.symptoms.as_deref(), Some(""));

        assert!(Args::try_parse_from(["symptom-checker", "fever", "cough"]).is_err());
    }

    #[test]
    fn test_text_may_start_with_hyphen() {
        let args = Args::parse_from(["symptom-checker", "-fever"]);
        assert_eq!(args.symptoms.as_deref(), Some("-fever"));

        let args = Args::parse_from(["symptom-checker", "- cough, chills"]);
        assert_eq!(args.symptoms.as_deref(), Some("- cough, chills"));

        let args = Args::parse_from(["symptom-checker", "--model", "m.json", "-fever"]);
        assert_eq!(args.model, Some(PathBuf::from("m.json")));
        assert_eq!(args.symptoms.as_deref(), Some("-fever"));
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "symptom-checker",
            "--model",
            "m.json",
            "--encoder",
            "e.json",
            "--log-level",
            "debug",
            "fever",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.artifacts.model, PathBuf::from("m.json"));
        assert_eq!(config.artifacts.encoder, PathBuf::from("e.json"));
        assert_eq!(config.log_level, "debug");
    }
}
