//! SQLite-based store.
//!
//! Provides durable storage for:
//! - The in-flight session record (kv table, JSON value)
//! - The append-only history log of completed sessions
//! - The user preferences record (kv table, JSON value)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::StorageError;
use crate::session::HistoryRecord;
use crate::storage::gateway::{SessionRecord, SessionStore};
use crate::storage::{data_dir, Preferences};

const KEY_SESSION: &str = "session";
const KEY_PREFERENCES: &str = "preferences";

/// SQLite store at `<data dir>/focusbubble.db`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at the default data directory.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?
            .join("focusbubble.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &std::path::Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS history (
                id                   INTEGER PRIMARY KEY AUTOINCREMENT,
                date                 TEXT NOT NULL,
                duration_secs        INTEGER NOT NULL,
                distraction_count    INTEGER NOT NULL,
                distraction_stamps   TEXT NOT NULL DEFAULT '[]',
                estimated_focus_secs INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_date ON history(date);",
        )?;
        Ok(())
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SessionStore for SqliteStore {
    fn load_session(&self) -> Result<Option<SessionRecord>, StorageError> {
        // Malformed JSON reads as absence, per the gateway contract.
        Ok(self
            .kv_get(KEY_SESSION)?
            .and_then(|json| serde_json::from_str(&json).ok()))
    }

    fn save_session(&mut self, record: &SessionRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(record).map_err(|e| StorageError::MalformedRecord {
            key: KEY_SESSION.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(KEY_SESSION, &json)
    }

    fn clear_session(&mut self) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(&SessionRecord::default()).unwrap_or_else(|_| "{}".to_string());
        self.kv_set(KEY_SESSION, &json)
    }

    fn append_history(&mut self, record: &HistoryRecord) -> Result<(), StorageError> {
        let stamps = serde_json::to_string(&record.distraction_stamps).map_err(|e| {
            StorageError::MalformedRecord {
                key: "distraction_stamps".to_string(),
                message: e.to_string(),
            }
        })?;
        self.conn.execute(
            "INSERT INTO history
                (date, duration_secs, distraction_count, distraction_stamps, estimated_focus_secs)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.date.to_rfc3339(),
                record.duration_secs,
                record.distraction_count,
                stamps,
                record.estimated_focus_secs,
            ],
        )?;
        Ok(())
    }

    fn load_history(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, duration_secs, distraction_count, distraction_stamps,
                    estimated_focus_secs
             FROM history ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u64>(4)?,
            ))
        })?;

        let mut history = Vec::new();
        for row in rows {
            let (date, duration_secs, distraction_count, stamps, estimated_focus_secs) = row?;
            // Rows with an unreadable date are skipped rather than surfaced.
            let Ok(date) = DateTime::parse_from_rfc3339(&date) else {
                continue;
            };
            history.push(HistoryRecord {
                date: date.with_timezone(&Utc),
                duration_secs,
                distraction_count,
                distraction_stamps: serde_json::from_str(&stamps).unwrap_or_default(),
                estimated_focus_secs,
            });
        }
        Ok(history)
    }

    fn clear_history(&mut self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM history", [])?;
        Ok(())
    }

    fn load_preferences(&self) -> Result<Preferences, StorageError> {
        Ok(self
            .kv_get(KEY_PREFERENCES)?
            .map(|json| Preferences::from_json_or_default(&json))
            .unwrap_or_default())
    }

    fn save_preferences(&mut self, prefs: &Preferences) -> Result<(), StorageError> {
        let json = serde_json::to_string(prefs).map_err(|e| StorageError::MalformedRecord {
            key: KEY_PREFERENCES.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(KEY_PREFERENCES, &json)
    }
}
