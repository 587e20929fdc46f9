//! Display status derived from raw node fields.
//!
//! Every function here is pure: the current time is always passed in, never
//! read from the clock, so identical inputs give identical answers.

use chrono::{DateTime, Duration, Utc};
use std::net::IpAddr;

/// A node counts as online when its last heartbeat is younger than this.
pub const ONLINE_WINDOW_SECS: i64 = 5 * 60;

/// Approximate liveness: `true` iff `last_seen` is set and less than five
/// minutes old. The client sees no heartbeat stream, so this is a heuristic.
pub fn is_online(last_seen: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_seen {
        Some(seen) => now.signed_duration_since(seen) < Duration::seconds(ONLINE_WINDOW_SECS),
        None => false,
    }
}

/// `true` iff an expiry is set (and is not the zero timestamp) and has passed
pub fn is_expired(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expiry {
        Some(at) if !is_zero_timestamp(&at) => now >= at,
        _ => false,
    }
}

/// Seconds from the Unix epoch to 0001-01-01T00:00:00Z, the zero time a Go
/// server sends for "never expires"
pub const GO_ZERO_TIME_SECS: i64 = -62_135_596_800;

/// Both the Unix epoch (unset protobuf timestamp) and the Go zero time mean
/// "no expiry"
fn is_zero_timestamp(at: &DateTime<Utc>) -> bool {
    at.timestamp_subsec_nanos() == 0
        && (at.timestamp() == 0 || at.timestamp() == GO_ZERO_TIME_SECS)
}

/// How a node's namespace relates to the namespace being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceRelation {
    /// No filter is active, or the node belongs to the filtered namespace
    Owned,
    /// The node is shared into the filtered namespace from elsewhere
    Shared,
}

pub fn namespace_relation(current: &str, owner: &str) -> NamespaceRelation {
    if current.is_empty() || current == owner {
        NamespaceRelation::Owned
    } else {
        NamespaceRelation::Shared
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteApproval<'a> {
    pub route: &'a str,
    pub approved: bool,
}

/// Pair every requested route with its approval state, in requested order.
///
/// Enabled routes that were never requested are ignored.
pub fn route_approval<'a>(requested: &'a [String], enabled: &[String]) -> Vec<RouteApproval<'a>> {
    requested
        .iter()
        .map(|route| RouteApproval {
            route: route.as_str(),
            approved: enabled.iter().any(|e| e == route),
        })
        .collect()
}

/// First address text of each family, exactly as the server sent it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifiedAddresses<'a> {
    pub ipv4: Option<&'a str>,
    pub ipv6: Option<&'a str>,
}

/// First IPv4 and first IPv6 address; later addresses of the same family are dropped.
///
/// Each entry pairs the received text with its parsed form, which is only
/// used to tell the families apart.
pub fn classify_addresses<'a>(addresses: &[(&'a str, IpAddr)]) -> ClassifiedAddresses<'a> {
    let mut classified = ClassifiedAddresses::default();

    for (text, addr) in addresses {
        match addr {
            IpAddr::V4(_) if classified.ipv4.is_none() => classified.ipv4 = Some(*text),
            IpAddr::V6(_) if classified.ipv6.is_none() => classified.ipv6 = Some(*text),
            _ => {}
        }
    }

    classified
}
