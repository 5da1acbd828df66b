//! In-memory store.
//!
//! Models the browser-style string key-value medium the gateway abstracts
//! over: each logical record is one JSON string under a fixed key. Used by
//! tests and embeddings that do not want a database on disk.

use std::collections::HashMap;

use crate::error::StorageError;
use crate::session::HistoryRecord;
use crate::storage::gateway::{SessionRecord, SessionStore};
use crate::storage::Preferences;

const KEY_SESSION: &str = "focusbubble_session";
const KEY_HISTORY: &str = "focusbubble_history";
const KEY_PREFERENCES: &str = "focusbubble_preferences";

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn put<T: serde::Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::MalformedRecord {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.records.insert(key.to_string(), json);
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn load_session(&self) -> Result<Option<SessionRecord>, StorageError> {
        Ok(self
            .records
            .get(KEY_SESSION)
            .and_then(|json| serde_json::from_str(json).ok()))
    }

    fn save_session(&mut self, record: &SessionRecord) -> Result<(), StorageError> {
        self.put(KEY_SESSION, record)
    }

    fn clear_session(&mut self) -> Result<(), StorageError> {
        self.put(KEY_SESSION, &SessionRecord::default())
    }

    fn append_history(&mut self, record: &HistoryRecord) -> Result<(), StorageError> {
        let mut history = self.load_history()?;
        history.push(record.clone());
        self.put(KEY_HISTORY, &history)
    }

    fn load_history(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        Ok(self
            .records
            .get(KEY_HISTORY)
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default())
    }

    fn clear_history(&mut self) -> Result<(), StorageError> {
        self.records.remove(KEY_HISTORY);
        Ok(())
    }

    fn load_preferences(&self) -> Result<Preferences, StorageError> {
        Ok(self
            .records
            .get(KEY_PREFERENCES)
            .map(|json| Preferences::from_json_or_default(json))
            .unwrap_or_default())
    }

    fn save_preferences(&mut self, prefs: &Preferences) -> Result<(), StorageError> {
        self.put(KEY_PREFERENCES, prefs)
    }
}
