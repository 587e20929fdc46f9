//! Subcommand implementations

pub mod nodes;

pub use nodes::{execute, NodeCommand, Outcome};
