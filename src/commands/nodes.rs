/*!
 * Node lifecycle commands
 *
 * Each command validates its parameters, then performs one remote call
 * (two for delete and move, which fetch the node first). Nothing is
 * retried; the first failure ends the command.
 */

use crate::error::{NodectlError, Result};
use crate::node::{Column, ColumnCatalog};
use crate::prompt::Confirm;
use nodectl_interface::{NodeRecord, NodeService};
use serde::Serialize;
use tracing::{debug, info};

pub const REGISTERED: &str = "Node registered";
pub const EXPIRED: &str = "Node expired";
pub const DELETED: &str = "Node deleted";
pub const NOT_DELETED: &str = "Node not deleted";
pub const MOVED: &str = "Node moved to another namespace";

const CANNOT_REGISTER: &str = "Cannot register node";
const CANNOT_LIST: &str = "Cannot get nodes";
const CANNOT_EXPIRE: &str = "Cannot expire node";
const CANNOT_GET: &str = "Error getting node";
const CANNOT_DELETE: &str = "Error deleting node";
const CANNOT_MOVE: &str = "Error moving node";

/// A fully parsed `nodes` subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeCommand {
    Register {
        namespace: String,
        key: String,
    },
    List {
        namespace: Option<String>,
        columns: Vec<String>,
    },
    Expire {
        id: u64,
    },
    Delete {
        id: u64,
        force: bool,
    },
    Move {
        id: u64,
        namespace: String,
    },
}

impl NodeCommand {
    pub fn name(&self) -> &'static str {
        match self {
            NodeCommand::Register { .. } => "register",
            NodeCommand::List { .. } => "list",
            NodeCommand::Expire { .. } => "expire",
            NodeCommand::Delete { .. } => "delete",
            NodeCommand::Move { .. } => "move",
        }
    }

    /// Context attached to a failure of the command's first remote call
    pub fn error_context(&self) -> &'static str {
        match self {
            NodeCommand::Register { .. } => CANNOT_REGISTER,
            NodeCommand::List { .. } => CANNOT_LIST,
            NodeCommand::Expire { .. } => CANNOT_EXPIRE,
            NodeCommand::Delete { .. } | NodeCommand::Move { .. } => CANNOT_GET,
        }
    }

    /// Check every parameter without touching the server
    pub fn validate(&self, catalog: &ColumnCatalog) -> Result<()> {
        match self {
            NodeCommand::Register { namespace, key } => {
                require_non_blank("namespace", namespace)?;
                require_non_blank("key", key)
            }
            NodeCommand::List { namespace, columns } => {
                if let Some(ns) = namespace {
                    require_non_blank("namespace", ns)?;
                }
                catalog.resolve(columns).map(|_| ())
            }
            NodeCommand::Expire { id } | NodeCommand::Delete { id, .. } => require_id(*id),
            NodeCommand::Move { id, namespace } => {
                require_id(*id)?;
                require_non_blank("namespace", namespace)
            }
        }
    }
}

fn require_non_blank(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NodectlError::Parameter(format!("--{} must not be empty", name)));
    }
    Ok(())
}

fn require_id(id: u64) -> Result<()> {
    if id == 0 {
        return Err(NodectlError::Parameter(
            "--identifier must be a positive node id".to_string(),
        ));
    }
    Ok(())
}

/// What a successful command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A single node came back from a mutating call
    Node {
        node: NodeRecord,
        message: &'static str,
    },

    /// Result of `list`, with the columns to show in table mode
    Nodes {
        nodes: Vec<NodeRecord>,
        columns: Vec<Column>,
        namespace: Option<String>,
    },

    Deleted,

    /// The operator declined the delete prompt
    NotDeleted,
}

/// Body of a structured delete result
#[derive(Debug, Serialize)]
pub struct DeleteResult<'a> {
    pub result: &'a str,
}

impl Outcome {
    /// One-line confirmation shown in table mode, if the outcome has one
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Outcome::Node { message, .. } => Some(*message),
            Outcome::Nodes { .. } => None,
            Outcome::Deleted => Some(DELETED),
            Outcome::NotDeleted => Some(NOT_DELETED),
        }
    }
}

/// Run `command` against `service`.
///
/// `confirm` is consulted only by a delete without `force`.
pub async fn execute<S, C>(
    service: &S,
    confirm: &mut C,
    catalog: &ColumnCatalog,
    command: NodeCommand,
) -> Result<Outcome>
where
    S: NodeService + ?Sized,
    C: Confirm + ?Sized,
{
    command.validate(catalog)?;
    debug!("Running nodes {}", command.name());

    match command {
        NodeCommand::Register { namespace, key } => {
            let node = service
                .register_node(&namespace, &key)
                .await
                .map_err(|e| NodectlError::remote(CANNOT_REGISTER, e))?;

            info!("Registered node {} ({}) in namespace {}", node.id, node.name, namespace);
            Ok(Outcome::Node {
                node,
                message: REGISTERED,
            })
        }

        NodeCommand::List { namespace, columns } => {
            let columns = catalog.resolve(&columns)?;
            let nodes = service
                .list_nodes(namespace.as_deref())
                .await
                .map_err(|e| NodectlError::remote(CANNOT_LIST, e))?;

            debug!("Listed {} nodes", nodes.len());
            Ok(Outcome::Nodes {
                nodes,
                columns,
                namespace,
            })
        }

        NodeCommand::Expire { id } => {
            let node = service
                .expire_node(id)
                .await
                .map_err(|e| NodectlError::remote(CANNOT_EXPIRE, e))?;

            info!("Expired node {}", id);
            Ok(Outcome::Node {
                node,
                message: EXPIRED,
            })
        }

        NodeCommand::Delete { id, force } => {
            let node = service
                .get_node(id)
                .await
                .map_err(|e| NodectlError::remote(CANNOT_GET, e))?;

            if !force {
                let prompt = format!("Do you want to remove the node {}?", node.name);
                if !confirm.confirm(&prompt)? {
                    info!("Deletion of node {} declined", id);
                    return Ok(Outcome::NotDeleted);
                }
            }

            service
                .delete_node(id)
                .await
                .map_err(|e| NodectlError::remote(CANNOT_DELETE, e))?;

            info!("Deleted node {} ({})", id, node.name);
            Ok(Outcome::Deleted)
        }

        NodeCommand::Move { id, namespace } => {
            service
                .get_node(id)
                .await
                .map_err(|e| NodectlError::remote(CANNOT_GET, e))?;

            let node = service
                .move_node(id, &namespace)
                .await
                .map_err(|e| NodectlError::remote(CANNOT_MOVE, e))?;

            info!("Moved node {} to namespace {}", id, namespace);
            Ok(Outcome::Node {
                node,
                message: MOVED,
            })
        }
    }
}
