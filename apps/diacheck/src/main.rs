//! DiaCheck binary entry point.

use clap::Parser;
use diacheck::cli::{self, Cli};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!("DiaCheck started with verbosity level: {}", cli.verbose);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout stays clean for `--json` output.
///
/// `RUST_LOG` wins over the `-v` count when set.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info,diacheck=debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}
