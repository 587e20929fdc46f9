//! Access to the coordination server
//!
//! - `RemoteService` (from `nodectl-connect`): the live gRPC client
//! - `MockService`: in-memory implementation for testing (in tests module)

pub use nodectl_connect::{ConnectConfig, RemoteService};
pub use nodectl_interface::{NodeRecord, NodeService, RemoteCode, ServiceError};

use crate::config::CliConfig;
use crate::error::{NodectlError, Result};

#[cfg(test)]
pub mod mock;

#[cfg(test)]
pub use mock::{MockCall, MockService};

/// Translate the CLI configuration into connection settings
pub fn connect_config(config: &CliConfig) -> ConnectConfig {
    ConnectConfig {
        address: config.address.clone(),
        api_key: config.api_key.clone(),
        timeout: config.timeout(),
    }
}

/// Open a channel to the configured server.
///
/// Connection problems are reported with the context of the command that
/// needed the server, the same way a failed remote call would be.
pub async fn connect(config: &CliConfig, context: &str) -> Result<RemoteService> {
    RemoteService::connect(&connect_config(config))
        .await
        .map_err(|e| NodectlError::remote(context, e.into()))
}
