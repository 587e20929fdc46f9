/*!
 * nodectl - operator CLI for a mesh coordination server
 *
 * Lists, registers, expires, deletes and moves the nodes known to the
 * server, rendering results either as an aligned table or as JSON/YAML.
 */

pub mod cli_style;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod output;
pub mod prompt;
pub mod service;

// Re-export commonly used types
pub use commands::{execute, NodeCommand, Outcome};
pub use config::{CliConfig, LogLevel};
pub use error::{NodectlError, Result};
pub use node::{Column, ColumnCatalog};
pub use output::{OutputFormat, Renderer};
pub use prompt::{Confirm, TerminalConfirm};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
