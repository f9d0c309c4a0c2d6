use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::Result;

/// Durable client-local key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites any previous value under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// When `key` was last written, for backends that record it.
    fn updated_at(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value: rusqlite::Result<String> = self.conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );

        match value {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        debug!(key, bytes = value.len(), "kv value written");
        Ok(())
    }

    // RFC 3339
    fn updated_at(&self, key: &str) -> Result<Option<String>> {
        let updated: rusqlite::Result<String> = self.conn.query_row(
            "SELECT updated_at FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );

        match updated {
            Ok(ts) => Ok(Some(ts)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store; nothing survives the session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_store() -> SqliteStore {
        let store = SqliteStore::open(":memory:").expect("Failed to create in-memory database");
        store.init().expect("Failed to initialize database");
        store
    }

    mod sqlite_tests {
        use super::*;

        #[test]
        fn init_creates_table() {
            let store = setup_store();
            let rows: i64 = store
                .conn
                .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
                .expect("kv_store table should exist");
            assert_eq!(rows, 0);
        }

        #[test]
        fn init_is_idempotent() {
            let mut store = setup_store();
            store.set("k", "v").unwrap();

            store.init().expect("Re-init should succeed");

            assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        }

        #[test]
        fn get_missing_key() {
            let store = setup_store();
            assert!(store.get("nope").unwrap().is_none());
            assert!(store.updated_at("nope").unwrap().is_none());
        }

        #[test]
        fn set_overwrites() {
            let mut store = setup_store();
            store.set("k", "first").unwrap();
            store.set("k", "second").unwrap();

            assert_eq!(store.get("k").unwrap(), Some("second".to_string()));

            let rows: i64 = store
                .conn
                .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
                .unwrap();
            assert_eq!(rows, 1);
        }

        #[test]
        fn set_stamps_updated_at() {
            let mut store = setup_store();
            store.set("k", "v").unwrap();

            let ts = store.updated_at("k").unwrap().unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        }

        #[test]
        fn keys_are_independent() {
            let mut store = setup_store();
            store.set("a", "1").unwrap();
            store.set("b", "2").unwrap();

            assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
            assert_eq!(store.get("b").unwrap(), Some("2".to_string()));
        }

        #[test]
        fn values_survive_reopen() {
            let path = std::env::temp_dir().join(format!(
                "bizcoach_store_test_{}.db",
                std::process::id()
            ));
            let _ = std::fs::remove_file(&path);

            {
                let mut store = SqliteStore::open(&path).unwrap();
                store.init().unwrap();
                store.set("k", "persisted").unwrap();
            }

            let store = SqliteStore::open(&path).unwrap();
            store.init().unwrap();
            assert_eq!(store.get("k").unwrap(), Some("persisted".to_string()));

            drop(store);
            let _ = std::fs::remove_file(&path);
        }
    }

    mod memory_tests {
        use super::*;

        #[test]
        fn get_set_roundtrip() {
            let mut store = MemoryStore::new();
            assert!(store.get("k").unwrap().is_none());

            store.set("k", "v").unwrap();
            assert_eq!(store.get("k").unwrap(), Some("v".to_string()));

            store.set("k", "w").unwrap();
            assert_eq!(store.get("k").unwrap(), Some("w".to_string()));
            assert!(store.updated_at("k").unwrap().is_none());
        }
    }
}
