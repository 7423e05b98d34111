//! Key-value store abstraction for persisted state.
//!
//! Everything the engine persists goes through [`KvStore`]: one string value
//! per string key, no transactions, no schema versioning. `SqliteKv` is the
//! production backend; `MemoryKv` backs tests and never touches disk.

use crate::core::db;
use crate::core::error::YinianError;
use rusqlite::{Connection, params};
use std::collections::BTreeMap;
use std::path::Path;

pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, YinianError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), YinianError>;
    fn delete(&mut self, key: &str) -> Result<(), YinianError>;
    /// Wipe every key. Used only by full reset.
    fn clear(&mut self) -> Result<(), YinianError>;
}

/// SQLite-backed store: a single `kv` table in `state.db` under the store root.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    pub fn open(root: &Path) -> Result<Self, YinianError> {
        let conn = db::initialize_state_db(root)?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, YinianError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(YinianError::RusqliteError(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), YinianError> {
        self.conn.execute(
            "INSERT INTO kv(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), YinianError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), YinianError> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

/// In-memory fake with the same semantics as `SqliteKv`.
#[derive(Debug, Default)]
pub struct MemoryKv {
    map: BTreeMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, YinianError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), YinianError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), YinianError> {
        self.map.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), YinianError> {
        self.map.clear();
        Ok(())
    }
}
