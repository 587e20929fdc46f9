/*!
 * Error types for nodectl
 */

use nodectl_interface::ServiceError;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, NodectlError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_REMOTE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_RENDER: i32 = 3;

#[derive(Debug)]
pub enum NodectlError {
    /// Missing or invalid command parameter; no remote call was issued
    Parameter(String),

    /// Invalid configuration (config file, column selection, output format)
    Config(String),

    /// The coordination server (or the channel to it) failed the request
    Remote {
        /// What nodectl was doing, e.g. "Cannot expire node"
        context: String,
        source: ServiceError,
    },

    /// A node record could not be turned into table cells
    Rendering(String),

    /// The interactive confirmation could not be shown or answered
    Prompt(String),

    /// I/O error
    Io(io::Error),

    /// Structured output could not be produced
    Serialization(String),
}

impl NodectlError {
    /// Wrap a service failure with local context
    pub fn remote(context: impl Into<String>, source: ServiceError) -> Self {
        NodectlError::Remote {
            context: context.into(),
            source,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NodectlError::Parameter(_) | NodectlError::Config(_) => EXIT_USAGE,
            NodectlError::Rendering(_) | NodectlError::Serialization(_) => EXIT_RENDER,
            NodectlError::Remote { .. } | NodectlError::Prompt(_) | NodectlError::Io(_) => {
                EXIT_REMOTE
            }
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            NodectlError::Parameter(_) => ErrorCategory::Validation,
            NodectlError::Config(_) => ErrorCategory::Configuration,
            NodectlError::Remote {
                source: ServiceError::Remote { .. },
                ..
            } => ErrorCategory::Remote,
            NodectlError::Remote { .. } => ErrorCategory::Network,
            NodectlError::Rendering(_) | NodectlError::Serialization(_) => {
                ErrorCategory::Rendering
            }
            NodectlError::Prompt(_) => ErrorCategory::Interaction,
            NodectlError::Io(_) => ErrorCategory::IoError,
        }
    }

    /// The server's own message, if the server rejected the request
    pub fn remote_message(&self) -> Option<String> {
        match self {
            NodectlError::Remote { source, .. } => Some(source.remote_message()),
            _ => None,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Parameter validation errors
    Validation,
    /// Configuration errors
    Configuration,
    /// Rejected by the coordination server
    Remote,
    /// Transport/connection errors
    Network,
    /// Table or structured output errors
    Rendering,
    /// Confirmation prompt errors
    Interaction,
    /// I/O operation errors
    IoError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Remote => write!(f, "remote"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Rendering => write!(f, "rendering"),
            ErrorCategory::Interaction => write!(f, "interaction"),
            ErrorCategory::IoError => write!(f, "io"),
        }
    }
}

impl fmt::Display for NodectlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodectlError::Parameter(msg) => {
                write!(f, "Invalid parameter: {}", msg)
            }
            NodectlError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            NodectlError::Remote { context, source } => {
                write!(f, "{}: {}", context, source.remote_message())
            }
            NodectlError::Rendering(msg) => {
                write!(f, "Error converting to table: {}", msg)
            }
            NodectlError::Prompt(msg) => {
                write!(f, "Confirmation failed: {}", msg)
            }
            NodectlError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            NodectlError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for NodectlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NodectlError::Io(err) => Some(err),
            NodectlError::Remote { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for NodectlError {
    fn from(err: io::Error) -> Self {
        NodectlError::Io(err)
    }
}

impl From<serde_json::Error> for NodectlError {
    fn from(err: serde_json::Error) -> Self {
        NodectlError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for NodectlError {
    fn from(err: serde_yaml::Error) -> Self {
        NodectlError::Serialization(err.to_string())
    }
}
