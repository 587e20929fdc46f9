//! Mock coordination server for testing
//!
//! Keeps nodes in memory and records every call, so tests can assert not
//! only on results but also on which remote operations were (not) issued.

use nodectl_interface::{NodeRecord, NodeService, RemoteCode, Result, ServiceError};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// One call received by the mock, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Register { namespace: String, key: String },
    List { namespace: Option<String> },
    Get { id: u64 },
    Expire { id: u64 },
    Delete { id: u64 },
    Move { id: u64, namespace: String },
}

#[derive(Debug, Default)]
struct MockState {
    nodes: BTreeMap<u64, NodeRecord>,
    calls: Vec<MockCall>,
    next_id: u64,
    failing: Option<ServiceError>,
}

/// In-memory `NodeService`
///
/// # Example
///
/// ```rust,ignore
/// let service = MockService::new();
/// service.add_node(NodeRecord::new(1, "laptop", "nodekey:...", "ops"));
///
/// let nodes = service.list_nodes(None).await?;
/// assert_eq!(nodes.len(), 1);
/// assert_eq!(service.calls(), vec![MockCall::List { namespace: None }]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockService {
    state: Arc<RwLock<MockState>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&self, node: NodeRecord) {
        let mut state = self.state.write().unwrap();
        state.next_id = state.next_id.max(node.id);
        state.nodes.insert(node.id, node);
    }

    /// Make every following call fail with `error`
    pub fn fail_with(&self, error: ServiceError) {
        self.state.write().unwrap().failing = Some(error);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.read().unwrap().calls.clone()
    }

    pub fn node(&self, id: u64) -> Option<NodeRecord> {
        self.state.read().unwrap().nodes.get(&id).cloned()
    }

    /// Record the call, then hand back the injected failure if there is one
    fn record(&self, call: MockCall) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.calls.push(call);
        match &state.failing {
            Some(ServiceError::Remote { code, message }) => {
                Err(ServiceError::remote(*code, message.clone()))
            }
            Some(ServiceError::Transport(msg)) => Err(ServiceError::Transport(msg.clone())),
            Some(ServiceError::Decode(msg)) => Err(ServiceError::Decode(msg.clone())),
            None => Ok(()),
        }
    }

    fn not_found() -> ServiceError {
        ServiceError::remote(RemoteCode::NotFound, "machine not found")
    }
}

#[async_trait::async_trait]
impl NodeService for MockService {
    async fn register_node(&self, namespace: &str, key: &str) -> Result<NodeRecord> {
        self.record(MockCall::Register {
            namespace: namespace.to_string(),
            key: key.to_string(),
        })?;

        let mut state = self.state.write().unwrap();
        if state.nodes.values().any(|n| n.node_key == key) {
            return Err(ServiceError::remote(
                RemoteCode::AlreadyExists,
                "machine already registered",
            ));
        }

        state.next_id += 1;
        let node = NodeRecord::new(state.next_id, format!("node-{}", state.next_id), key, namespace);
        state.nodes.insert(node.id, node.clone());
        Ok(node)
    }

    async fn list_nodes(&self, namespace: Option<&str>) -> Result<Vec<NodeRecord>> {
        self.record(MockCall::List {
            namespace: namespace.map(str::to_string),
        })?;

        let state = self.state.read().unwrap();
        Ok(state
            .nodes
            .values()
            .filter(|n| namespace.map_or(true, |ns| n.namespace == ns))
            .cloned()
            .collect())
    }

    async fn get_node(&self, id: u64) -> Result<NodeRecord> {
        self.record(MockCall::Get { id })?;
        self.node(id).ok_or_else(Self::not_found)
    }

    async fn expire_node(&self, id: u64) -> Result<NodeRecord> {
        self.record(MockCall::Expire { id })?;

        let mut state = self.state.write().unwrap();
        let node = state.nodes.get_mut(&id).ok_or_else(Self::not_found)?;
        node.expiry = Some(chrono::Utc::now());
        Ok(node.clone())
    }

    async fn delete_node(&self, id: u64) -> Result<()> {
        self.record(MockCall::Delete { id })?;

        let mut state = self.state.write().unwrap();
        state.nodes.remove(&id).map(|_| ()).ok_or_else(Self::not_found)
    }

    async fn move_node(&self, id: u64, namespace: &str) -> Result<NodeRecord> {
        self.record(MockCall::Move {
            id,
            namespace: namespace.to_string(),
        })?;

        let mut state = self.state.write().unwrap();
        let node = state.nodes.get_mut(&id).ok_or_else(Self::not_found)?;
        node.namespace = namespace.to_string();
        Ok(node.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_register_and_list() {
        let service = MockService::new();
        service
            .register_node("ops", "nodekey:aa")
            .await
            .unwrap();
        service
            .register_node("dev", "nodekey:bb")
            .await
            .unwrap();

        assert_eq!(service.list_nodes(None).await.unwrap().len(), 2);
        assert_eq!(service.list_nodes(Some("ops")).await.unwrap().len(), 1);
        assert_eq!(service.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_mock_duplicate_key_rejected() {
        let service = MockService::new();
        service.register_node("ops", "nodekey:aa").await.unwrap();
        let err = service.register_node("ops", "nodekey:aa").await.unwrap_err();
        assert_eq!(err.code(), Some(RemoteCode::AlreadyExists));
    }

    #[tokio::test]
    async fn test_mock_injected_failure_is_recorded() {
        let service = MockService::new();
        service.fail_with(ServiceError::Transport("connection refused".into()));

        assert!(service.get_node(7).await.is_err());
        assert_eq!(service.calls(), vec![MockCall::Get { id: 7 }]);
    }
}
