//! Column projection: turn node records into table rows.
//!
//! The set of selectable columns, their headers and the default selection
//! live in a [`ColumnCatalog`] value handed to the [`Projection`]; nothing
//! here is global.

use crate::error::{NodectlError, Result};
use crate::node::key::NodeKey;
use crate::node::status::{
    classify_addresses, is_expired, is_online, namespace_relation, route_approval,
    NamespaceRelation,
};
use chrono::{DateTime, Utc};
use nodectl_interface::NodeRecord;
use std::fmt;
use std::net::IpAddr;

/// Timestamp layout used in table cells
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Marker in front of an approved route
pub const APPROVED_ROUTE_MARKER: &str = "*";

/// Every column a node table can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Name,
    NodeKey,
    Namespace,
    IpAddresses,
    Ephemeral,
    LastSeen,
    Online,
    Expired,
    Tags,
    Routes,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Id,
        Column::Name,
        Column::NodeKey,
        Column::Namespace,
        Column::IpAddresses,
        Column::Ephemeral,
        Column::LastSeen,
        Column::Online,
        Column::Expired,
        Column::Tags,
        Column::Routes,
    ];

    /// Key used on the command line (`--columns id,name`)
    pub fn key(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::NodeKey => "nodekey",
            Column::Namespace => "namespace",
            Column::IpAddresses => "ip_addresses",
            Column::Ephemeral => "ephemeral",
            Column::LastSeen => "last_seen",
            Column::Online => "online",
            Column::Expired => "expired",
            Column::Tags => "tags",
            Column::Routes => "routes",
        }
    }

    /// Look up a column by key; case-insensitive, `-` accepted for `_`
    pub fn from_key(key: &str) -> Option<Column> {
        let normalized = key.trim().to_ascii_lowercase().replace('-', "_");
        Column::ALL.into_iter().find(|c| c.key() == normalized)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Selectable columns with their headers, plus the default selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCatalog {
    headers: Vec<(Column, String)>,
    defaults: Vec<Column>,
}

impl ColumnCatalog {
    pub fn new(headers: Vec<(Column, String)>, defaults: Vec<Column>) -> Self {
        Self { headers, defaults }
    }

    /// All eleven columns; the first nine are the default selection
    pub fn standard() -> Self {
        let headers = vec![
            (Column::Id, "ID"),
            (Column::Name, "Name"),
            (Column::NodeKey, "NodeKey"),
            (Column::Namespace, "Namespace"),
            (Column::IpAddresses, "IP addresses"),
            (Column::Ephemeral, "Ephemeral"),
            (Column::LastSeen, "Last seen"),
            (Column::Online, "Online"),
            (Column::Expired, "Expired"),
            (Column::Tags, "Tags"),
            (Column::Routes, "Routes"),
        ];
        let defaults = headers.iter().take(9).map(|(c, _)| *c).collect();

        Self::new(
            headers
                .into_iter()
                .map(|(c, h)| (c, h.to_string()))
                .collect(),
            defaults,
        )
    }

    pub fn header(&self, column: Column) -> Option<&str> {
        self.headers
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, h)| h.as_str())
    }

    pub fn defaults(&self) -> &[Column] {
        &self.defaults
    }

    fn available_keys(&self) -> String {
        self.headers
            .iter()
            .map(|(c, _)| c.key())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve requested keys to columns, keeping their order.
    ///
    /// Blank keys are skipped, and a request with no keys left selects the
    /// defaults. Any other key outside the catalog fails the whole request.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<Column>> {
        let keys: Vec<&str> = requested
            .iter()
            .map(|key| key.as_ref())
            .filter(|key| !key.trim().is_empty())
            .collect();

        if keys.is_empty() {
            return Ok(self.defaults.clone());
        }

        keys.into_iter()
            .map(|key| {
                Column::from_key(key)
                    .filter(|c| self.header(*c).is_some())
                    .ok_or_else(|| {
                        NodectlError::Config(format!(
                            "unknown column '{}' (available: {})",
                            key,
                            self.available_keys()
                        ))
                    })
            })
            .collect()
    }
}

impl Default for ColumnCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Display emphasis of a cell; never changes the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Positive,
    Negative,
    Owned,
    Shared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
        }
    }

    fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Header plus one row per node, all in the same column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableData {
    /// Row texts without tones, handy for assertions and plain output
    pub fn texts(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }
}

/// Ambient inputs of the two context-sensitive columns
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    /// Namespace filter of the list command, if any
    pub namespace_filter: Option<&'a str>,
    pub now: DateTime<Utc>,
}

/// A validated, ordered column selection
#[derive(Debug, Clone)]
pub struct Projection<'c> {
    catalog: &'c ColumnCatalog,
    columns: Vec<Column>,
}

impl<'c> Projection<'c> {
    /// Validate `requested` against `catalog`; fails before any row is built
    pub fn new<S: AsRef<str>>(catalog: &'c ColumnCatalog, requested: &[S]) -> Result<Self> {
        let columns = catalog.resolve(requested)?;
        Ok(Self { catalog, columns })
    }

    /// Use columns already resolved against `catalog`
    pub fn from_columns(catalog: &'c ColumnCatalog, columns: Vec<Column>) -> Self {
        Self { catalog, columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| {
                self.catalog
                    .header(*c)
                    .map(str::to_string)
                    .unwrap_or_else(|| c.key().to_string())
            })
            .collect()
    }

    /// Build the complete table, or nothing if any node cannot be rendered
    pub fn project(&self, nodes: &[NodeRecord], ctx: &ProjectionContext<'_>) -> Result<TableData> {
        let rows = nodes
            .iter()
            .map(|node| self.row(node, ctx))
            .collect::<Result<Vec<_>>>()?;

        Ok(TableData {
            header: self.header(),
            rows,
        })
    }

    fn row(&self, node: &NodeRecord, ctx: &ProjectionContext<'_>) -> Result<Vec<Cell>> {
        self.columns
            .iter()
            .map(|column| cell(*column, node, ctx))
            .collect()
    }
}

fn rendering_error(node: &NodeRecord, what: impl fmt::Display) -> NodectlError {
    NodectlError::Rendering(format!("node {} ({}): {}", node.id, node.name, what))
}

fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn addresses_text(node: &NodeRecord) -> Result<String> {
    let parsed = node
        .ip_addresses
        .iter()
        .map(|raw| {
            let text = raw.trim();
            text.parse::<IpAddr>()
                .map(|addr| (text, addr))
                .map_err(|e| rendering_error(node, format!("invalid address '{}': {}", raw, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let classified = classify_addresses(&parsed);
    Ok(format!(
        "{}, {}",
        classified.ipv4.unwrap_or_default(),
        classified.ipv6.unwrap_or_default()
    ))
}

fn routes_text(node: &NodeRecord) -> String {
    route_approval(&node.requested_routes, &node.enabled_routes)
        .into_iter()
        .map(|r| {
            if r.approved {
                format!("{}{}", APPROVED_ROUTE_MARKER, r.route)
            } else {
                r.route.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn cell(column: Column, node: &NodeRecord, ctx: &ProjectionContext<'_>) -> Result<Cell> {
    let cell = match column {
        Column::Id => Cell::plain(node.id.to_string()),
        Column::Name => Cell::plain(node.name.as_str()),
        Column::NodeKey => {
            let key = NodeKey::parse(&node.node_key).map_err(|e| rendering_error(node, e))?;
            Cell::plain(key.short_string())
        }
        Column::Namespace => {
            let tone = match namespace_relation(ctx.namespace_filter.unwrap_or(""), &node.namespace)
            {
                NamespaceRelation::Owned => Tone::Owned,
                NamespaceRelation::Shared => Tone::Shared,
            };
            Cell::toned(node.namespace.as_str(), tone)
        }
        Column::IpAddresses => Cell::plain(addresses_text(node)?),
        Column::Ephemeral => Cell::plain(node.ephemeral.to_string()),
        Column::LastSeen => Cell::plain(format_timestamp(node.last_seen)),
        Column::Online => {
            if is_online(node.last_seen, ctx.now) {
                Cell::toned("online", Tone::Positive)
            } else {
                Cell::toned("offline", Tone::Negative)
            }
        }
        Column::Expired => {
            if is_expired(node.expiry, ctx.now) {
                Cell::toned("yes", Tone::Negative)
            } else {
                Cell::toned("no", Tone::Positive)
            }
        }
        Column::Tags => Cell::plain(node.requested_tags.join(", ")),
        Column::Routes => Cell::plain(routes_text(node)),
    };

    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const KEY: &str = "nodekey:0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 3, 14, 12, 0, 0).unwrap()
    }

    fn node(id: u64, name: &str, namespace: &str) -> NodeRecord {
        let mut node = NodeRecord::new(id, name, KEY, namespace);
        node.ip_addresses = vec!["100.64.0.1".to_string(), "fd7a:115c:a1e0::1".to_string()];
        node.last_seen = Some(now() - Duration::minutes(1));
        node
    }

    fn ctx(filter: Option<&str>) -> ProjectionContext<'_> {
        ProjectionContext {
            namespace_filter: filter,
            now: now(),
        }
    }

    #[test]
    fn test_default_selection_on_two_nodes() {
        let catalog = ColumnCatalog::standard();
        let projection = Projection::new::<String>(&catalog, &[]).unwrap();
        let table = projection
            .project(&[node(1, "a", "ops"), node(2, "b", "ops")], &ctx(None))
            .unwrap();

        assert_eq!(
            table.header,
            vec![
                "ID",
                "Name",
                "NodeKey",
                "Namespace",
                "IP addresses",
                "Ephemeral",
                "Last seen",
                "Online",
                "Expired"
            ]
        );
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.len() == 9));
    }

    #[test]
    fn test_requested_order_is_preserved() {
        let catalog = ColumnCatalog::standard();
        let projection = Projection::new(&catalog, &["online", "id", "routes"]).unwrap();
        let table = projection.project(&[node(5, "x", "ops")], &ctx(None)).unwrap();

        assert_eq!(table.header, vec!["Online", "ID", "Routes"]);
        assert_eq!(table.texts(), vec![vec!["online", "5", ""]]);
    }

    #[test]
    fn test_unknown_column_fails_before_projection() {
        let catalog = ColumnCatalog::standard();
        let err = Projection::new(&catalog, &["id", "colour"]).unwrap_err();

        assert!(matches!(err, NodectlError::Config(ref msg) if msg.contains("colour")));
    }

    #[test]
    fn test_blank_column_keys_are_skipped() {
        let catalog = ColumnCatalog::standard();

        assert_eq!(catalog.resolve(&[""]).unwrap(), catalog.defaults());
        assert_eq!(catalog.resolve(&[" ", ""]).unwrap(), catalog.defaults());
        assert_eq!(
            catalog.resolve(&["id", "", "name"]).unwrap(),
            vec![Column::Id, Column::Name]
        );
    }

    #[test]
    fn test_column_keys_are_forgiving() {
        assert_eq!(Column::from_key("IP-Addresses"), Some(Column::IpAddresses));
        assert_eq!(Column::from_key(" last_seen "), Some(Column::LastSeen));
        assert_eq!(Column::from_key("lastseen"), None);
    }

    #[test]
    fn test_catalog_restricts_selectable_columns() {
        let catalog = ColumnCatalog::new(
            vec![(Column::Id, "Identifier".to_string())],
            vec![Column::Id],
        );
        assert!(catalog.resolve(&["name"]).is_err());
        let projection = Projection::new::<&str>(&catalog, &[]).unwrap();
        assert_eq!(projection.header(), vec!["Identifier"]);
    }

    #[test]
    fn test_cell_formatting() {
        let mut n = node(42, "gateway", "ops");
        n.ephemeral = true;
        n.last_seen = Some(Utc.with_ymd_and_hms(2022, 3, 14, 11, 50, 7).unwrap());
        n.expiry = Some(now() - Duration::days(1));
        n.requested_tags = vec!["tag:web".to_string(), "tag:prod".to_string()];
        n.requested_routes = vec!["10.0.0.0/24".to_string(), "10.1.0.0/24".to_string()];
        n.enabled_routes = vec!["10.1.0.0/24".to_string()];

        let catalog = ColumnCatalog::standard();
        let keys: Vec<&str> = Column::ALL.iter().map(|c| c.key()).collect();
        let table = Projection::new(&catalog, &keys)
            .unwrap()
            .project(&[n], &ctx(None))
            .unwrap();

        assert_eq!(
            table.texts()[0],
            vec![
                "42",
                "gateway",
                "[AQIDB]",
                "ops",
                "100.64.0.1, fd7a:115c:a1e0::1",
                "true",
                "2022-03-14 11:50:07",
                "offline",
                "yes",
                "tag:web, tag:prod",
                "10.0.0.0/24, *10.1.0.0/24",
            ]
        );
    }

    #[test]
    fn test_address_placeholder_for_missing_family() {
        let mut n = node(1, "v4only", "ops");
        n.ip_addresses = vec!["100.64.0.7".to_string()];
        let catalog = ColumnCatalog::standard();
        let table = Projection::new(&catalog, &["ip_addresses"])
            .unwrap()
            .project(&[n], &ctx(None))
            .unwrap();

        assert_eq!(table.texts()[0][0], "100.64.0.7, ");
    }

    #[test]
    fn test_addresses_are_shown_as_received() {
        let mut n = node(1, "longform", "ops");
        n.ip_addresses = vec![
            "FD7A:115C:A1E0:0000:0000:0000:0000:0001".to_string(),
            "100.64.0.7".to_string(),
        ];
        let catalog = ColumnCatalog::standard();
        let table = Projection::new(&catalog, &["ip_addresses"])
            .unwrap()
            .project(&[n], &ctx(None))
            .unwrap();

        assert_eq!(
            table.texts()[0][0],
            "100.64.0.7, FD7A:115C:A1E0:0000:0000:0000:0000:0001"
        );
    }

    #[test]
    fn test_go_zero_expiry_is_not_expired() {
        let mut n = node(1, "forever", "ops");
        n.expiry = DateTime::from_timestamp(crate::node::status::GO_ZERO_TIME_SECS, 0);
        let catalog = ColumnCatalog::standard();
        let table = Projection::new(&catalog, &["expired"])
            .unwrap()
            .project(&[n], &ctx(None))
            .unwrap();

        assert_eq!(table.rows[0][0], Cell::toned("no", Tone::Positive));
    }

    #[test]
    fn test_namespace_tone_depends_on_filter() {
        let catalog = ColumnCatalog::standard();
        let projection = Projection::new(&catalog, &["namespace"]).unwrap();
        let nodes = [node(1, "own", "ops"), node(2, "shared", "dev")];

        let table = projection.project(&nodes, &ctx(Some("ops"))).unwrap();
        assert_eq!(table.rows[0][0].tone, Tone::Owned);
        assert_eq!(table.rows[1][0].tone, Tone::Shared);

        let unfiltered = projection.project(&nodes, &ctx(None)).unwrap();
        assert!(unfiltered.rows.iter().all(|r| r[0].tone == Tone::Owned));
    }

    #[test]
    fn test_enabled_route_outside_requested_is_not_shown() {
        let mut n = node(1, "r", "ops");
        n.requested_routes = vec!["10.0.0.0/24".to_string()];
        n.enabled_routes = vec!["192.168.0.0/24".to_string()];
        let catalog = ColumnCatalog::standard();
        let table = Projection::new(&catalog, &["routes"])
            .unwrap()
            .project(&[n], &ctx(None))
            .unwrap();

        assert_eq!(table.texts()[0][0], "10.0.0.0/24");
    }

    #[test]
    fn test_malformed_address_aborts_whole_table() {
        let mut bad = node(2, "bad", "ops");
        bad.ip_addresses = vec!["100.64.0.300".to_string()];
        let catalog = ColumnCatalog::standard();
        let result = Projection::new::<&str>(&catalog, &[])
            .unwrap()
            .project(&[node(1, "good", "ops"), bad], &ctx(None));

        assert!(matches!(result, Err(NodectlError::Rendering(ref msg)) if msg.contains("100.64.0.300")));
    }

    #[test]
    fn test_malformed_key_aborts_rendering() {
        let mut bad = node(3, "badkey", "ops");
        bad.node_key = "nodekey:1234".to_string();
        let catalog = ColumnCatalog::standard();
        let result = Projection::new(&catalog, &["nodekey"])
            .unwrap()
            .project(&[bad], &ctx(None));

        assert!(matches!(result, Err(NodectlError::Rendering(_))));
    }

    #[test]
    fn test_empty_node_list_gives_header_only() {
        let catalog = ColumnCatalog::standard();
        let table = Projection::new(&catalog, &["id", "name"])
            .unwrap()
            .project(&[], &ctx(None))
            .unwrap();
        assert_eq!(table.header.len(), 2);
        assert!(table.rows.is_empty());
    }
}
