//! `RocksDB` registry implementation.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossline_core::{ConnectionId, SessionId};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use crate::error::{RegistryError, Result};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::types::ConnectionRecord;
use crate::Registry;

/// RocksDB-backed registry implementation.
pub struct RocksRegistry {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksRegistry {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| RegistryError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| RegistryError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a record using CBOR.
    fn serialize(record: &ConnectionRecord) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(record, &mut buf)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a record from CBOR.
    fn deserialize(data: &[u8]) -> Result<ConnectionRecord> {
        ciborium::from_reader(data).map_err(|e| RegistryError::Serialization(e.to_string()))
    }

    /// Queue deletion of a record's session-index entry, if it has one.
    fn queue_index_removal(
        batch: &mut WriteBatch,
        cf_by_session: &Arc<BoundColumnFamily<'_>>,
        record: &ConnectionRecord,
    ) {
        if let Some(session_id) = &record.session_id {
            let index_key = keys::session_connection_key(session_id, &record.connection_id);
            batch.delete_cf(cf_by_session, index_key);
        }
    }
}

impl Registry for RocksRegistry {
    fn put_connection(
        &self,
        connection_id: &ConnectionId,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let cf_connections = self.cf(cf::CONNECTIONS)?;
        let cf_by_session = self.cf(cf::CONNECTIONS_BY_SESSION)?;

        let record = ConnectionRecord {
            connection_id: connection_id.clone(),
            session_id: None,
            connected_at: Utc::now(),
            registered_at: None,
            expires_at,
        };

        let key = keys::connection_key(connection_id);
        let value = Self::serialize(&record)?;

        let mut batch = WriteBatch::default();

        // A prior record under the same id would leave a dangling index entry
        if let Some(data) = self
            .db
            .get_cf(&cf_connections, &key)
            .map_err(|e| RegistryError::Database(e.to_string()))?
        {
            let old = Self::deserialize(&data)?;
            Self::queue_index_removal(&mut batch, &cf_by_session, &old);
        }

        batch.put_cf(&cf_connections, &key, &value);

        self.db
            .write(batch)
            .map_err(|e| RegistryError::Database(e.to_string()))?;

        Ok(())
    }

    fn attach_session(&self, connection_id: &ConnectionId, session_id: &SessionId) -> Result<()> {
        let cf_connections = self.cf(cf::CONNECTIONS)?;
        let cf_by_session = self.cf(cf::CONNECTIONS_BY_SESSION)?;

        let mut record = self
            .get_connection(connection_id)?
            .ok_or(RegistryError::NotFound)?;

        let mut batch = WriteBatch::default();

        // Re-registration with a different session moves the index entry
        if record.session_id.as_ref() != Some(session_id) {
            Self::queue_index_removal(&mut batch, &cf_by_session, &record);
        }

        record.session_id = Some(*session_id);
        record.registered_at = Some(Utc::now());

        let key = keys::connection_key(connection_id);
        let value = Self::serialize(&record)?;
        let index_key = keys::session_connection_key(session_id, connection_id);

        batch.put_cf(&cf_connections, &key, &value);
        batch.put_cf(&cf_by_session, &index_key, []);

        self.db
            .write(batch)
            .map_err(|e| RegistryError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_connection(&self, connection_id: &ConnectionId) -> Result<Option<ConnectionRecord>> {
        let cf = self.cf(cf::CONNECTIONS)?;
        let key = keys::connection_key(connection_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| RegistryError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn find_by_session(&self, session_id: &SessionId) -> Result<Option<ConnectionRecord>> {
        let cf_by_session = self.cf(cf::CONNECTIONS_BY_SESSION)?;
        let prefix = keys::session_prefix(session_id);
        let now = Utc::now();

        let mut best: Option<ConnectionRecord> = None;

        let iter = self.db.iterator_cf(
            &cf_by_session,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        for item in iter {
            let (key, _) = item.map_err(|e| RegistryError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            let connection_id = keys::extract_connection_id_from_session_key(&key)?;
            let Some(record) = self.get_connection(&connection_id)? else {
                // Dangling index entry from a concurrent remove; skip it
                continue;
            };

            if record.is_expired(now) || record.session_id.as_ref() != Some(session_id) {
                continue;
            }

            // Latest registration wins; connection id is the final tie-break
            let candidate_rank = (record.registered_at, record.connection_id.clone());
            let best_rank = best
                .as_ref()
                .map(|r| (r.registered_at, r.connection_id.clone()));

            if best_rank.is_none() || Some(candidate_rank) > best_rank {
                best = Some(record);
            }
        }

        Ok(best)
    }

    fn remove_connection(&self, connection_id: &ConnectionId) -> Result<()> {
        let cf_connections = self.cf(cf::CONNECTIONS)?;
        let cf_by_session = self.cf(cf::CONNECTIONS_BY_SESSION)?;

        // Absent record means a concurrent remove already won; that is fine
        let Some(record) = self.get_connection(connection_id)? else {
            return Ok(());
        };

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_connections, keys::connection_key(connection_id));
        Self::queue_index_removal(&mut batch, &cf_by_session, &record);

        self.db
            .write(batch)
            .map_err(|e| RegistryError::Database(e.to_string()))?;

        Ok(())
    }

    fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let cf_connections = self.cf(cf::CONNECTIONS)?;
        let cf_by_session = self.cf(cf::CONNECTIONS_BY_SESSION)?;

        let mut batch = WriteBatch::default();
        let mut count = 0usize;

        let iter = self.db.iterator_cf(&cf_connections, IteratorMode::Start);
        for item in iter {
            let (key, value) = item.map_err(|e| RegistryError::Database(e.to_string()))?;
            let record = Self::deserialize(&value)?;

            if record.is_expired(now) {
                batch.delete_cf(&cf_connections, &key);
                Self::queue_index_removal(&mut batch, &cf_by_session, &record);
                count += 1;
            }
        }

        if count > 0 {
            self.db
                .write(batch)
                .map_err(|e| RegistryError::Database(e.to_string()))?;
            tracing::debug!(count, "Swept expired connection records");
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_registry() -> (RocksRegistry, TempDir) {
        let dir = TempDir::new().unwrap();
        let registry = RocksRegistry::open(dir.path()).unwrap();
        (registry, dir)
    }

    fn future() -> DateTime<Utc> {
        Utc::now() + Duration::hours(2)
    }

    #[test]
    fn connection_lifecycle() {
        let (registry, _dir) = create_test_registry();
        let connection_id = ConnectionId::generate();
        let session_id = SessionId::generate();

        // Bare record on connect
        registry.put_connection(&connection_id, future()).unwrap();
        let record = registry.get_connection(&connection_id).unwrap().unwrap();
        assert!(record.session_id.is_none());
        assert!(record.registered_at.is_none());

        // Register
        registry.attach_session(&connection_id, &session_id).unwrap();
        let record = registry.get_connection(&connection_id).unwrap().unwrap();
        assert_eq!(record.session_id, Some(session_id));
        assert!(record.registered_at.is_some());

        // Resolve
        let found = registry.find_by_session(&session_id).unwrap().unwrap();
        assert_eq!(found.connection_id, connection_id);

        // Disconnect
        registry.remove_connection(&connection_id).unwrap();
        assert!(registry.get_connection(&connection_id).unwrap().is_none());
        assert!(registry.find_by_session(&session_id).unwrap().is_none());
    }

    #[test]
    fn attach_session_missing_record() {
        let (registry, _dir) = create_test_registry();
        let result = registry.attach_session(&ConnectionId::generate(), &SessionId::generate());
        assert!(matches!(result, Err(RegistryError::NotFound)));
    }

    #[test]
    fn remove_is_idempotent() {
        let (registry, _dir) = create_test_registry();
        let connection_id = ConnectionId::generate();

        registry.put_connection(&connection_id, future()).unwrap();
        registry.remove_connection(&connection_id).unwrap();

        // Second remove of the same id must not error
        registry.remove_connection(&connection_id).unwrap();
    }

    #[test]
    fn repeated_find_is_stable_without_reattach() {
        let (registry, _dir) = create_test_registry();
        let connection_id = ConnectionId::generate();
        let session_id = SessionId::generate();

        registry.put_connection(&connection_id, future()).unwrap();
        registry.attach_session(&connection_id, &session_id).unwrap();

        let first = registry.find_by_session(&session_id).unwrap().unwrap();
        let second = registry.find_by_session(&session_id).unwrap().unwrap();
        assert_eq!(first.connection_id, connection_id);
        assert_eq!(second.connection_id, connection_id);
    }

    #[test]
    fn find_skips_unregistered_records() {
        let (registry, _dir) = create_test_registry();
        let connection_id = ConnectionId::generate();
        let session_id = SessionId::generate();

        registry.put_connection(&connection_id, future()).unwrap();
        assert!(registry.find_by_session(&session_id).unwrap().is_none());
    }

    #[test]
    fn find_skips_expired_records() {
        let (registry, _dir) = create_test_registry();
        let connection_id = ConnectionId::generate();
        let session_id = SessionId::generate();

        registry
            .put_connection(&connection_id, Utc::now() - Duration::minutes(1))
            .unwrap();
        registry.attach_session(&connection_id, &session_id).unwrap();

        assert!(registry.find_by_session(&session_id).unwrap().is_none());
    }

    #[test]
    fn latest_registration_wins_on_multi_match() {
        let (registry, _dir) = create_test_registry();
        let session_id = SessionId::generate();

        // Rapid reconnect: two live records share the session
        let old_conn = ConnectionId::generate();
        registry.put_connection(&old_conn, future()).unwrap();
        registry.attach_session(&old_conn, &session_id).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));

        let new_conn = ConnectionId::generate();
        registry.put_connection(&new_conn, future()).unwrap();
        registry.attach_session(&new_conn, &session_id).unwrap();

        let found = registry.find_by_session(&session_id).unwrap().unwrap();
        assert_eq!(found.connection_id, new_conn);
    }

    #[test]
    fn reattach_moves_session_index() {
        let (registry, _dir) = create_test_registry();
        let connection_id = ConnectionId::generate();
        let first_session = SessionId::generate();
        let second_session = SessionId::generate();

        registry.put_connection(&connection_id, future()).unwrap();
        registry.attach_session(&connection_id, &first_session).unwrap();
        registry
            .attach_session(&connection_id, &second_session)
            .unwrap();

        assert!(registry.find_by_session(&first_session).unwrap().is_none());
        let found = registry.find_by_session(&second_session).unwrap().unwrap();
        assert_eq!(found.connection_id, connection_id);
    }

    #[test]
    fn put_overwrite_clears_stale_index() {
        let (registry, _dir) = create_test_registry();
        let connection_id = ConnectionId::generate();
        let session_id = SessionId::generate();

        registry.put_connection(&connection_id, future()).unwrap();
        registry.attach_session(&connection_id, &session_id).unwrap();

        // Same id reconnects before registering again
        registry.put_connection(&connection_id, future()).unwrap();

        assert!(registry.find_by_session(&session_id).unwrap().is_none());
        let record = registry.get_connection(&connection_id).unwrap().unwrap();
        assert!(record.session_id.is_none());
    }

    #[test]
    fn sweep_removes_expired_only() {
        let (registry, _dir) = create_test_registry();
        let session_id = SessionId::generate();

        let expired = ConnectionId::generate();
        registry
            .put_connection(&expired, Utc::now() - Duration::minutes(1))
            .unwrap();
        registry.attach_session(&expired, &session_id).unwrap();

        let live = ConnectionId::generate();
        registry.put_connection(&live, future()).unwrap();

        let swept = registry.sweep_expired(Utc::now()).unwrap();
        assert_eq!(swept, 1);
        assert!(registry.get_connection(&expired).unwrap().is_none());
        assert!(registry.get_connection(&live).unwrap().is_some());
        assert!(registry.find_by_session(&session_id).unwrap().is_none());
    }
}
