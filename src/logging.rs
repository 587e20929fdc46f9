/*!
 * Logging and tracing initialization
 *
 * Diagnostics never go to stdout; stdout belongs to command output.
 */

use std::fs::File;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{CliConfig, LogLevel};
use crate::error::{NodectlError, Result};

/// Crates whose events pass the default filter
const LOG_TARGETS: [&str; 3] = ["nodectl", "nodectl_connect", "nodectl_interface"];

/// Level actually used.
///
/// An explicit `--log-level` wins, then `-v`, then the configured level.
pub fn effective_level(config: &CliConfig, verbose: bool, explicit: Option<LogLevel>) -> Level {
    match explicit {
        Some(level) => level.to_tracing_level(),
        None if verbose => Level::DEBUG,
        None => config.log_level.to_tracing_level(),
    }
}

/// Filter directive for our own crates at `level`
pub fn filter_directive(level: Level) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize structured logging; `RUST_LOG` takes precedence when set
pub fn init_logging(config: &CliConfig, verbose: bool, explicit: Option<LogLevel>) -> Result<()> {
    let level = effective_level(config, verbose, explicit);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(level)))
        .map_err(|e| NodectlError::Config(format!("Failed to create log filter: {}", e)))?;

    if let Some(ref log_path) = config.log_file {
        init_file_logging(log_path, env_filter)?;
    } else {
        init_stderr_logging(env_filter);
    }

    Ok(())
}

/// Initialize logging to stderr
fn init_stderr_logging(env_filter: EnvFilter) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Initialize logging to a file
fn init_file_logging(log_path: &Path, env_filter: EnvFilter) -> Result<()> {
    let file = File::create(log_path)
        .map_err(|e| NodectlError::Config(format!("Failed to create log file: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(file)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false) // No ANSI colors in file
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
