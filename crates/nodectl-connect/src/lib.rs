//! nodectl Connect: client-side gRPC connectivity to a coordination server
//!
//! This crate provides the production implementation of the
//! [`NodeService`](nodectl_interface::NodeService) trait.
//!
//! # Architecture
//!
//! - **ConnectConfig**: address, API key and deadline for one CLI invocation
//! - **RemoteService**: implements `NodeService` by issuing unary gRPC calls
//! - **convert**: normalizes wire messages into `NodeRecord`s
//!
//! # Example
//!
//! ```rust,no_run
//! use nodectl_connect::{ConnectConfig, RemoteService};
//! use nodectl_interface::NodeService;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectConfig::new("http://127.0.0.1:50443");
//!     let service = RemoteService::connect(&config).await?;
//!
//!     let node = service.get_node(1).await?;
//!     println!("{} lives in {}", node.name, node.namespace);
//!     Ok(())
//! }
//! ```

pub mod convert;
pub mod error;
pub mod remote;

pub use error::ConnectError;
pub use remote::{ConnectConfig, RemoteService};
