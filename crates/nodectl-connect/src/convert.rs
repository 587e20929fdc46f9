//! Wire message -> `NodeRecord` conversion

use crate::error::ConnectError;
use chrono::{DateTime, Utc};
use nodectl_interface::NodeRecord;
use nodectl_proto::Machine;
use prost_types::Timestamp;

/// Convert a protobuf timestamp into UTC time.
///
/// Negative nanos and out-of-range seconds are rejected rather than clamped.
pub fn to_datetime(ts: &Timestamp) -> Result<DateTime<Utc>, ConnectError> {
    let invalid = || ConnectError::InvalidTimestamp {
        seconds: ts.seconds,
        nanos: ts.nanos,
    };
    let nanos = u32::try_from(ts.nanos).map_err(|_| invalid())?;
    DateTime::from_timestamp(ts.seconds, nanos).ok_or_else(invalid)
}

fn optional_datetime(ts: Option<&Timestamp>) -> Result<Option<DateTime<Utc>>, ConnectError> {
    ts.map(to_datetime).transpose()
}

/// Normalize a machine message into a `NodeRecord`
pub fn node_from_machine(machine: Machine) -> Result<NodeRecord, ConnectError> {
    let ephemeral = machine
        .pre_auth_key
        .as_ref()
        .is_some_and(|key| key.ephemeral);

    Ok(NodeRecord {
        id: machine.id,
        name: machine.name,
        machine_key: machine.machine_key,
        node_key: machine.node_key,
        namespace: machine.namespace.map(|ns| ns.name).unwrap_or_default(),
        ip_addresses: machine.ip_addresses,
        ephemeral,
        last_seen: optional_datetime(machine.last_seen.as_ref())?,
        expiry: optional_datetime(machine.expiry.as_ref())?,
        created_at: optional_datetime(machine.created_at.as_ref())?,
        requested_tags: machine.request_tags,
        requested_routes: machine.requested_routes,
        enabled_routes: machine.enabled_routes,
    })
}

/// Unwrap the `machine` field every single-node response carries
pub fn required_node(machine: Option<Machine>) -> Result<NodeRecord, ConnectError> {
    machine
        .ok_or(ConnectError::MissingField("machine"))
        .and_then(node_from_machine)
}
