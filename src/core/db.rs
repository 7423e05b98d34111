use crate::core::error::YinianError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub const STATE_DB_NAME: &str = "state.db";

/// Single key-value table; one row per persisted key, values are JSON or
/// scalar strings. No cross-key transactions are offered or needed.
pub const KV_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
";

pub fn db_connect(db_path: &str) -> Result<Connection, YinianError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(YinianError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(YinianError::RusqliteError)?;
    Ok(conn)
}

pub fn state_db_path(root: &Path) -> PathBuf {
    root.join(STATE_DB_NAME)
}

pub fn initialize_state_db(root: &Path) -> Result<Connection, YinianError> {
    let db_path = state_db_path(root);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(YinianError::IoError)?;
    }
    let conn = db_connect(&db_path.to_string_lossy())?;
    conn.execute(KV_SCHEMA, [])?;
    Ok(conn)
}
