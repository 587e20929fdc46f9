//! nodectl Interface: the coordination service as seen by the CLI
//!
//! This crate defines the `NodeService` trait, which abstracts the node
//! management operations of a remote coordination server so that the command
//! layer can run against a real server (gRPC) or an in-memory double in tests.
//!
//! # Operations
//!
//! Every operation is a single request/response round trip:
//!
//! 1. **Register**: bind a pending node key to a namespace
//! 2. **Inspect**: list nodes (optionally by namespace) or fetch one by id
//! 3. **Mutate**: expire, delete, or move a node to another namespace
//!
//! # Example
//!
//! ```rust,no_run
//! use nodectl_interface::NodeService;
//!
//! async fn count_nodes<S: NodeService>(service: &S) -> nodectl_interface::Result<usize> {
//!     let nodes = service.list_nodes(Some("engineering")).await?;
//!     Ok(nodes.len())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Status code attached to a rejection from the coordination server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteCode {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    InvalidArgument,
    Unauthenticated,
    Unavailable,
    DeadlineExceeded,
    Other,
}

impl fmt::Display for RemoteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteCode::NotFound => "not found",
            RemoteCode::AlreadyExists => "already exists",
            RemoteCode::PermissionDenied => "permission denied",
            RemoteCode::InvalidArgument => "invalid argument",
            RemoteCode::Unauthenticated => "unauthenticated",
            RemoteCode::Unavailable => "unavailable",
            RemoteCode::DeadlineExceeded => "deadline exceeded",
            RemoteCode::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The server answered and refused the request.
    ///
    /// `message` is the server's own text, already unwrapped from the
    /// transport envelope.
    #[error("{message}")]
    Remote { code: RemoteCode, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Shorthand for a remote rejection
    pub fn remote(code: RemoteCode, message: impl Into<String>) -> Self {
        ServiceError::Remote {
            code,
            message: message.into(),
        }
    }

    /// The message a user should see, without any local wrapping
    pub fn remote_message(&self) -> String {
        match self {
            ServiceError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn code(&self) -> Option<RemoteCode> {
        match self {
            ServiceError::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Snapshot of one node as reported by the coordination server.
///
/// A record is built fresh from each response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Numeric identifier, stable for the node's lifetime
    pub id: u64,

    /// Display name (not unique)
    pub name: String,

    /// Machine key as sent by the server
    #[serde(default)]
    pub machine_key: String,

    /// Node public key, usually `nodekey:`-prefixed hex
    pub node_key: String,

    /// Name of the namespace owning the node
    pub namespace: String,

    /// Assigned addresses, IPv4 and/or IPv6 literals
    #[serde(default)]
    pub ip_addresses: Vec<String>,

    /// Registered through an ephemeral pre-authorization key
    #[serde(default)]
    pub ephemeral: bool,

    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,

    /// Absent (or the Unix epoch) means the node never expires
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub requested_tags: Vec<String>,

    /// Routes in the order the node advertised them
    #[serde(default)]
    pub requested_routes: Vec<String>,

    /// Routes approved by an administrator
    #[serde(default)]
    pub enabled_routes: Vec<String>,
}

impl NodeRecord {
    /// Minimal record with the identifying fields set and everything else empty
    pub fn new(
        id: u64,
        name: impl Into<String>,
        node_key: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            machine_key: String::new(),
            node_key: node_key.into(),
            namespace: namespace.into(),
            ip_addresses: Vec::new(),
            ephemeral: false,
            last_seen: None,
            expiry: None,
            created_at: None,
            requested_tags: Vec::new(),
            requested_routes: Vec::new(),
            enabled_routes: Vec::new(),
        }
    }
}

/// Node management operations of the coordination server
///
/// Implementations:
/// - **RemoteService** (`nodectl-connect`): gRPC client for a live server
/// - **MockService** (tests): in-memory records with a call log
///
/// Implementations must be `Send + Sync` so a single instance can be shared
/// across async boundaries.
#[async_trait]
pub trait NodeService: Send + Sync {
    /// Register the node holding `key` into `namespace`
    async fn register_node(&self, namespace: &str, key: &str) -> Result<NodeRecord>;

    /// List nodes, restricted to `namespace` when given
    async fn list_nodes(&self, namespace: Option<&str>) -> Result<Vec<NodeRecord>>;

    async fn get_node(&self, id: u64) -> Result<NodeRecord>;

    /// Force the node to re-authenticate; returns the updated record
    async fn expire_node(&self, id: u64) -> Result<NodeRecord>;

    async fn delete_node(&self, id: u64) -> Result<()>;

    /// Move the node into `namespace`; returns the updated record
    async fn move_node(&self, id: u64, namespace: &str) -> Result<NodeRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_displays_server_message_only() {
        let err = ServiceError::remote(RemoteCode::NotFound, "machine not found");
        assert_eq!(err.to_string(), "machine not found");
        assert_eq!(err.remote_message(), "machine not found");
        assert_eq!(err.code(), Some(RemoteCode::NotFound));
    }

    #[test]
    fn test_transport_error_has_no_code() {
        let err = ServiceError::Transport("connection refused".to_string());
        assert_eq!(err.code(), None);
        assert_eq!(err.remote_message(), "transport error: connection refused");
    }

    #[test]
    fn test_node_record_json_keys() {
        let node = NodeRecord::new(7, "laptop", "nodekey:00", "dev");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["node_key"], "nodekey:00");
        assert_eq!(json["namespace"], "dev");
        assert!(json["last_seen"].is_null());
        assert_eq!(json["requested_routes"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_node_record_deserializes_with_missing_optional_fields() {
        let node: NodeRecord = serde_json::from_str(
            r#"{"id": 3, "name": "db", "node_key": "k", "namespace": "ops"}"#,
        )
        .unwrap();
        assert_eq!(node, NodeRecord::new(3, "db", "k", "ops"));
    }

    #[test]
    fn test_remote_code_display() {
        assert_eq!(RemoteCode::AlreadyExists.to_string(), "already exists");
        assert_eq!(RemoteCode::DeadlineExceeded.to_string(), "deadline exceeded");
    }
}
