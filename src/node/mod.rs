//! Node presentation: derived status, key abbreviation and table projection

pub mod columns;
pub mod key;
pub mod status;

pub use columns::{
    Cell, Column, ColumnCatalog, Projection, ProjectionContext, TableData, Tone, TIMESTAMP_FORMAT,
};
pub use key::{KeyError, NodeKey};
pub use status::{
    classify_addresses, is_expired, is_online, namespace_relation, route_approval,
    ClassifiedAddresses, NamespaceRelation, RouteApproval,
};
