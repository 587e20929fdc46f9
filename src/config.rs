/*!
 * Configuration types for nodectl
 */

use crate::error::{NodectlError, Result};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_ADDRESS: &str = "NODECTL_ADDRESS";
pub const ENV_API_KEY: &str = "NODECTL_API_KEY";
pub const ENV_TIMEOUT: &str = "NODECTL_TIMEOUT";

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// gRPC address of the coordination server
    #[serde(default = "default_address")]
    pub address: String,

    /// API key presented as a bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    /// Connect timeout and per-call deadline, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Structured output format used when `--output` is not given
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

fn default_address() -> String {
    "http://127.0.0.1:50443".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            log_level: LogLevel::default(),
            log_file: None,
            output: None,
        }
    }
}

/// Logging verbosity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    #[default]
    Warn,

    /// Info, warnings, and errors
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            NodectlError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| NodectlError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// `<config dir>/nodectl/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nodectl").join("config.toml"))
    }

    /// Defaults overlaid with a config file.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Overlay `NODECTL_*` variables, read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup(ENV_ADDRESS) {
            self.address = address;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.timeout_secs = timeout.trim().parse().map_err(|_| {
                NodectlError::Config(format!(
                    "{} must be a number of seconds, got '{}'",
                    ENV_TIMEOUT, timeout
                ))
            })?;
        }
        Ok(())
    }

    /// Reject settings no command could work with
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(NodectlError::Config("address must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(NodectlError::Config(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
