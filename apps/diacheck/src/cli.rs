//! # CLI Module
//!
//! Command-line interface for DiaCheck.
//!
//! Commands:
//! - `assess`: interactive three-step wizard on stdin/stdout
//! - `predict`: submit a prepared answers file once
//! - `health`: probe the prediction service
//! - `fields`: print the questionnaire

use crate::config::{AppConfig, ConfigError, ConnectionArgs};
use crate::gateway::{GatewayError, HttpGateway, PredictionGateway};
use crate::session;
use crate::terminal::{Exit, Terminal};
use clap::{Parser, Subcommand};
use diacheck_core::{
    FieldKind, HealthProfile, PredictionResult, Step, SubmissionState, SubmitBlocked, Wizard,
};
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Diabetes risk assessment against a remote prediction service
#[derive(Debug, Parser)]
#[command(name = "diacheck", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Answer the questionnaire step by step and get a prediction
    Assess {
        /// Start with Gender = Male and every symptom = No
        #[arg(long)]
        baseline: bool,
    },
    /// Submit a JSON answers file keyed by field name
    Predict {
        /// Path to the answers file
        #[arg(short, long)]
        answers: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the prediction service is up
    Health {
        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the questionnaire fields by step
    Fields {
        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
    },
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("cannot read answers from {path}: {source}")]
    Answers {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The answers do not cover every field.
    #[error("answers are incomplete: step {step} is missing {}", missing.join(", "))]
    Incomplete { step: Step, missing: Vec<String> },

    /// The submission ran and failed; the message is the user-facing one.
    #[error("{0}")]
    Rejected(String),

    #[error("prediction service is unhealthy: status {0:?}")]
    Unhealthy(String),
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Dispatch a parsed command line against the real service and stdio.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::try_from(&cli.connection)?;
    debug!(predict_url = %config.predict_url(), timeout = ?config.timeout, "configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Fields { json } => cmd_fields(json, &mut out),
        Commands::Health { json } => {
            let gateway = HttpGateway::new(&config)?;
            cmd_health(&gateway, json, &mut out).await
        }
        Commands::Predict { answers, json } => {
            let gateway = HttpGateway::new(&config)?;
            cmd_predict(&gateway, &answers, json, &mut out).await
        }
        Commands::Assess { baseline } => {
            let gateway = HttpGateway::new(&config)?;
            let stdin = io::stdin();
            cmd_assess(&gateway, baseline, stdin.lock(), &mut out).await
        }
    }
}

/// Load an answers file. Keys are wire keys; unknown keys are rejected.
pub fn load_answers(path: &Path) -> Result<HealthProfile, CliError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| CliError::Answers {
        path: path.to_path_buf(),
        source,
    })
}

/// Submit an answers file once and print the result.
pub async fn cmd_predict<G: PredictionGateway>(
    gateway: &G,
    answers: &Path,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let profile = load_answers(answers)?;
    info!(path = %answers.display(), fields = profile.filled_count(), "answers loaded");

    let mut wizard = Wizard::with_profile(profile);
    let outcome = session::submit(&mut wizard, gateway)
        .await
        .map(SubmissionState::clone);
    let state = match outcome {
        Ok(state) => state,
        Err(SubmitBlocked::Invalid { step }) => {
            let missing = wizard
                .errors()
                .fields()
                .map(|field| field.key().to_string())
                .collect();
            return Err(CliError::Incomplete { step, missing });
        }
        Err(blocked @ SubmitBlocked::InFlight) => {
            return Err(CliError::Rejected(blocked.to_string()));
        }
    };

    match state {
        SubmissionState::Succeeded(result) => print_result(&result, json, out),
        SubmissionState::Failed(message) => Err(CliError::Rejected(message)),
        SubmissionState::Idle | SubmissionState::Loading => {
            Err(CliError::Rejected("submission did not complete".to_string()))
        }
    }
}

fn print_result(
    result: &PredictionResult,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if json {
        let value = json!({
            "probability_positive": result.probability_positive,
            "diabetic": result.diabetic,
            "percent": result.percent_label(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(out, "Your Result")?;
        writeln!(out, "  {}", result.percent_label())?;
        writeln!(out, "  {}", result.headline())?;
        writeln!(out, "  {}", result.advice())?;
    }
    Ok(())
}

/// Probe the service and print its status.
pub async fn cmd_health(
    gateway: &HttpGateway,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let health = gateway.health().await?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&health)?)?;
    } else {
        writeln!(out, "Prediction service: {}", health.status)?;
    }
    if health.is_ok() {
        Ok(())
    } else {
        Err(CliError::Unhealthy(health.status))
    }
}

/// Print the questionnaire grouped by step.
pub fn cmd_fields(json: bool, out: &mut impl Write) -> Result<(), CliError> {
    if json {
        let steps: Vec<_> = Step::ALL
            .iter()
            .map(|step| {
                json!({
                    "step": step,
                    "title": step.title(),
                    "fields": step.fields().collect::<Vec<_>>(),
                })
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&steps)?)?;
        return Ok(());
    }

    for step in Step::ALL {
        writeln!(out, "Step {}: {}", step, step.title())?;
        for spec in step.fields() {
            let kind = match spec.kind {
                FieldKind::Digits => "number",
                FieldKind::Gender => "Male/Female",
                FieldKind::YesNo => "Yes/No",
            };
            writeln!(out, "  {:<20} {:<12} {}", format!("{:?}", spec.key), kind, spec.prompt)?;
        }
    }
    Ok(())
}

/// Run the interactive wizard.
pub async fn cmd_assess<G: PredictionGateway>(
    gateway: &G,
    baseline: bool,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut wizard = if baseline {
        Wizard::with_profile(HealthProfile::baseline())
    } else {
        Wizard::new()
    };

    let mut terminal = Terminal::new(input, out);
    let exit = terminal.run(&mut wizard, gateway).await?;
    debug!(?exit, "assessment finished");
    if exit == Exit::EndOfInput {
        writeln!(terminal.into_output())?;
    }
    Ok(())
}
