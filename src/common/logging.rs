//! Logging and tracing configuration
//!
//! Diagnostics go to stderr through `tracing`. The per-call narration and the
//! run summary are printed to stdout separately, so `RUST_LOG` only changes
//! how much of the harness's internal reasoning is shown.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// Default file name when `--log-file` is given without a path
const LOG_FILE_NAME: &str = "smoke.log";

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smoke=info,warn"))
}

/// Initialize tracing for the CLI (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
pub fn init_cli() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Initialize tracing with an additional log file
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process. Falls back to stderr-only logging when the
/// file cannot be opened.
pub fn init_with_file(path: &Path) -> Option<WorkerGuard> {
    let (dir, file_name) = match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) => (
            if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir
            },
            name,
        ),
        _ => {
            eprintln!("Warning: Invalid log file path: {}", path.display());
            init_cli();
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        init_cli();
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .compact();

    tracing_subscriber::registry()
        .with(default_filter())
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Some(guard)
}

/// Get the default log file path in the platform data directory
pub fn default_log_path() -> Option<PathBuf> {
    match paths::ensure_log_dir() {
        Ok(Some(dir)) => Some(dir.join(LOG_FILE_NAME)),
        Ok(None) => None,
        Err(e) => {
            eprintln!("Warning: Could not create log directory: {}", e);
            None
        }
    }
}
