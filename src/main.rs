//! Heart Disease Prediction System
//!
//! Loads the dataset, trains the logistic regression once, then assesses
//! patient records entered at the terminal until the operator is done.
//!
//! ```bash
//! cargo run --release
//! HEART_RISK_DATA=path/to/heart.csv cargo run --release
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use heart_risk::data::{DatasetError, DatasetLoader};
use heart_risk::logging::setup_logging;
use heart_risk::models::RiskPredictor;
use heart_risk::session::{render, Session, TerminalInput};
use heart_risk::Config;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};

/// The tool takes no flags; only `--help` is recognised
#[derive(Parser)]
#[command(name = "heart_risk")]
#[command(about = "Heart disease risk assessment with logistic regression")]
#[command(after_help = "Environment:\n  HEART_RISK_DATA  Path to the heart disease CSV file [default: heart_disease_data.csv]\n  HEART_RISK_LOG   Log level used when RUST_LOG is not set [default: warn]")]
struct Cli {}

fn run(config: Config) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let dataset = DatasetLoader::load(&config.data.path)
        .with_context(|| format!("Could not load dataset '{}'", config.data.path.display()))?;

    let mut predictor = RiskPredictor::new(config.training.clone());
    let report = predictor.fit(&dataset).context("Failed to train model")?.clone();

    render::write_welcome(&mut io::stdout(), &dataset.summary(), &report)?;

    let input = TerminalInput::new().context("Failed to open terminal input")?;
    let outcome = Session::new(&predictor, &config.fields, input, io::stdout()).run()?;
    info!("{} assessment(s) completed", outcome.assessments);

    Ok(())
}

fn main() -> ExitCode {
    let _ = Cli::parse();
    let config = Config::from_env();
    setup_logging(&config.logging.level);

    // Ctrl-C while a prompt is active is handled by the line editor; this
    // covers loading and training.
    if let Err(e) = ctrlc::set_handler(|| {
        println!("\n\nGoodbye!");
        std::process::exit(0);
    }) {
        error!("Failed to set Ctrl+C handler: {}", e);
    }

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(DatasetError::NotFound(_)) = e.downcast_ref::<DatasetError>() {
                eprintln!("Please ensure the heart disease dataset is in the current directory.");
            }
            ExitCode::FAILURE
        }
    }
}
