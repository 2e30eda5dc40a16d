use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the results directory and the log file's parent directory exist.
pub fn ensure_directories(results_dir: &Path, log_file: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(results_dir)?;
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a level name such as `WARNING` to a tracing filter directive.
///
/// Unknown names pass through unchanged so full `EnvFilter` directives
/// (`summary_data=debug,info`) still work.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Every record goes to stderr and is appended to `log_file`. Falls back to
/// `"info"` if the level string is not a valid filter.
pub fn setup_logging(log_level: &str, log_file: &Path) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let console = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);
    let log_sink = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(log_sink)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
