//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary connection records, keyed by `connection_id`.
    pub const CONNECTIONS: &str = "connections";

    /// Index: connections by session, keyed by `session_id || connection_id`.
    pub const CONNECTIONS_BY_SESSION: &str = "connections_by_session";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::CONNECTIONS, cf::CONNECTIONS_BY_SESSION]
}
