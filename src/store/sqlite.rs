//! SQLite-backed profile store
//!
//! Stores each user's snapshot as a JSON document in a `profiles` table
//! (`~/.studykit/profiles.db` by default). The database is a plain document
//! store here; all progress semantics live in the engine.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;

use super::{ProfileStore, StoreError};
use crate::progress::ProgressSnapshot;

/// Database wrapper shared across clones
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the profile database at the default location
    /// (~/.studykit/profiles.db)
    pub fn open_default() -> Result<Self> {
        let db_path = crate::config::Config::global_config_dir().join("profiles.db");
        Self::open(&db_path)
    }

    /// Open or create the profile database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create profile dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open profile db: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("profile db lock poisoned")
    }

    fn init_schema(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    /// Delete every stored profile
    pub fn reset_all(&self) -> Result<()> {
        self.conn().execute("DELETE FROM profiles", [])?;
        Ok(())
    }
}

/// SQL schema for the profile database
const SCHEMA_SQL: &str = r#"
-- Progress profiles (one JSON document per user)
CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    snapshot TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn get(&self, user_id: &str) -> Result<ProgressSnapshot, StoreError> {
        let payload: String = {
            let conn = self.conn();
            match conn.query_row(
                "SELECT snapshot FROM profiles WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            ) {
                Ok(payload) => payload,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(StoreError::NotFound(user_id.to_string()));
                }
                Err(err) => {
                    return Err(StoreError::Corrupt {
                        user: user_id.to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        };

        let snapshot: ProgressSnapshot =
            serde_json::from_str(&payload).map_err(|err| StoreError::Corrupt {
                user: user_id.to_string(),
                reason: err.to_string(),
            })?;
        snapshot.validate().map_err(|reason| StoreError::Corrupt {
            user: user_id.to_string(),
            reason,
        })?;
        Ok(snapshot)
    }

    async fn put(&self, user_id: &str, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        let payload =
            serde_json::to_string(snapshot).map_err(|err| StoreError::Write(err.to_string()))?;
        let now = Utc::now().timestamp_millis();

        self.conn()
            .execute(
                r#"INSERT INTO profiles (user_id, snapshot, updated_at)
                   VALUES (?1, ?2, ?3)
                   ON CONFLICT(user_id) DO UPDATE SET snapshot = ?2, updated_at = ?3"#,
                rusqlite::params![user_id, payload, now],
            )
            .map_err(|err| StoreError::Write(err.to_string()))?;
        Ok(())
    }
}
