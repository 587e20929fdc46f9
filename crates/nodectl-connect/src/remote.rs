//! RemoteService: NodeService implementation that talks to a coordination server via gRPC

use async_trait::async_trait;
use nodectl_interface::{NodeRecord, NodeService, Result};
use nodectl_proto::{
    DeleteMachineRequest, ExpireMachineRequest, GetMachineRequest, HeadscaleServiceClient,
    ListMachinesRequest, MoveMachineRequest, RegisterMachineRequest,
};
use std::time::Duration;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::{debug, info};

use crate::convert::{node_from_machine, required_node};
use crate::error::ConnectError;

/// Where and how to reach the coordination server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// gRPC address, e.g. `https://hs.example.com:443` or `http://127.0.0.1:50443`
    pub address: String,

    /// API key sent as a bearer token with every request
    pub api_key: Option<String>,

    /// Connect timeout and per-request deadline
    pub timeout: Duration,
}

impl ConnectConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }

    /// Build the tonic endpoint without connecting
    pub fn endpoint(&self) -> std::result::Result<Endpoint, ConnectError> {
        let invalid = |reason: String| ConnectError::InvalidEndpoint {
            address: self.address.clone(),
            reason,
        };

        if !(self.address.starts_with("http://") || self.address.starts_with("https://")) {
            return Err(invalid("address must start with http:// or https://".to_string()));
        }

        let mut endpoint = Endpoint::from_shared(self.address.clone())
            .map_err(|e| invalid(e.to_string()))?
            .connect_timeout(self.timeout)
            .timeout(self.timeout);

        if self.address.starts_with("https://") {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().with_webpki_roots())
                .map_err(|e| invalid(e.to_string()))?;
        }

        Ok(endpoint)
    }
}

/// A `NodeService` backed by a live coordination server.
///
/// Cheaply cloneable (tonic's `Channel` is reference counted internally).
///
/// # Example
///
/// ```rust,no_run
/// use nodectl_connect::{ConnectConfig, RemoteService};
/// use nodectl_interface::NodeService;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = ConnectConfig::new("http://127.0.0.1:50443");
/// config.api_key = Some("secret".to_string());
///
/// let service = RemoteService::connect(&config).await?;
/// for node in service.list_nodes(None).await? {
///     println!("{} {}", node.id, node.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RemoteService {
    client: HeadscaleServiceClient,

    /// Bearer token attached to every request
    api_key: Option<String>,

    timeout: Duration,
}

impl RemoteService {
    /// Wrap an already established channel
    pub fn new(channel: Channel, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: HeadscaleServiceClient::new(channel),
            api_key,
            timeout,
        }
    }

    /// Connect to the server described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The address is not a valid http(s) URI
    /// - The connection cannot be established within the timeout
    pub async fn connect(config: &ConnectConfig) -> std::result::Result<Self, ConnectError> {
        let endpoint = config.endpoint()?;

        debug!("Connecting to coordination server at {}", config.address);

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| ConnectError::ConnectionFailed {
                address: config.address.clone(),
                reason: e.to_string(),
            })?;

        info!("Connected to coordination server at {}", config.address);

        Ok(Self::new(channel, config.api_key.clone(), config.timeout))
    }

    /// Attach the API key and deadline to a request
    fn request<T>(&self, message: T) -> std::result::Result<tonic::Request<T>, ConnectError> {
        let mut req = tonic::Request::new(message);
        req.set_timeout(self.timeout);

        if let Some(ref key) = self.api_key {
            let value: MetadataValue<Ascii> = format!("Bearer {}", key).parse()?;
            req.metadata_mut().insert("authorization", value);
        }

        Ok(req)
    }
}

#[async_trait]
impl NodeService for RemoteService {
    async fn register_node(&self, namespace: &str, key: &str) -> Result<NodeRecord> {
        debug!("RegisterMachine namespace={}", namespace);

        let req = self.request(RegisterMachineRequest {
            namespace: namespace.to_string(),
            key: key.to_string(),
        })?;

        let response = self
            .client
            .clone()
            .register_machine(req)
            .await
            .map_err(ConnectError::from)?;

        Ok(required_node(response.into_inner().machine)?)
    }

    async fn list_nodes(&self, namespace: Option<&str>) -> Result<Vec<NodeRecord>> {
        debug!("ListMachines namespace={:?}", namespace);

        let req = self.request(ListMachinesRequest {
            namespace: namespace.unwrap_or_default().to_string(),
        })?;

        let response = self
            .client
            .clone()
            .list_machines(req)
            .await
            .map_err(ConnectError::from)?;

        let nodes = response
            .into_inner()
            .machines
            .into_iter()
            .map(node_from_machine)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Received {} nodes", nodes.len());

        Ok(nodes)
    }

    async fn get_node(&self, id: u64) -> Result<NodeRecord> {
        debug!("GetMachine id={}", id);

        let req = self.request(GetMachineRequest { machine_id: id })?;

        let response = self
            .client
            .clone()
            .get_machine(req)
            .await
            .map_err(ConnectError::from)?;

        Ok(required_node(response.into_inner().machine)?)
    }

    async fn expire_node(&self, id: u64) -> Result<NodeRecord> {
        debug!("ExpireMachine id={}", id);

        let req = self.request(ExpireMachineRequest { machine_id: id })?;

        let response = self
            .client
            .clone()
            .expire_machine(req)
            .await
            .map_err(ConnectError::from)?;

        Ok(required_node(response.into_inner().machine)?)
    }

    async fn delete_node(&self, id: u64) -> Result<()> {
        debug!("DeleteMachine id={}", id);

        let req = self.request(DeleteMachineRequest { machine_id: id })?;

        self.client
            .clone()
            .delete_machine(req)
            .await
            .map_err(ConnectError::from)?;

        Ok(())
    }

    async fn move_node(&self, id: u64, namespace: &str) -> Result<NodeRecord> {
        debug!("MoveMachine id={} namespace={}", id, namespace);

        let req = self.request(MoveMachineRequest {
            machine_id: id,
            namespace: namespace.to_string(),
        })?;

        let response = self
            .client
            .clone()
            .move_machine(req)
            .await
            .map_err(ConnectError::from)?;

        Ok(required_node(response.into_inner().machine)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_service_is_send_sync() {
        // Compile-time check that RemoteService satisfies trait bounds
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RemoteService>();
    }

    #[test]
    fn test_endpoint_rejects_missing_scheme() {
        let config = ConnectConfig::new("127.0.0.1:50443");
        assert!(matches!(
            config.endpoint(),
            Err(ConnectError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_endpoint_accepts_plain_http() {
        let config = ConnectConfig::new("http://127.0.0.1:50443");
        assert!(config.endpoint().is_ok());
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(
            ConnectConfig::new("http://localhost").timeout,
            Duration::from_secs(5)
        );
    }
}
