//! Backend smoke-test harness
//!
//! Authenticates against the restaurant backend, resolves baseline fixtures
//! and exercises its endpoints, printing a diagnostic for every call.

use clap::Parser;
use smoke::commands::Commands;
use smoke::common::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smoke", about = "End-to-end smoke tests for the restaurant backend")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a file (default path: platform data dir)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_path = match cli.log_file {
        Some(Some(path)) => Some(path),
        Some(None) => logging::default_log_path(),
        None => None,
    };
    let _guard = match log_path {
        Some(path) => logging::init_with_file(&path),
        None => {
            logging::init_cli();
            None
        }
    };

    if let Err(e) = smoke::cli::dispatch(cli.command, cli.config.as_deref()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
