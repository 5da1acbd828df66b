//! Persistence gateway.
//!
//! The core treats storage as an abstract record store: writes complete
//! synchronously from the caller's perspective and each write fully
//! overwrites its logical record (preference updates merge into the
//! existing record first). The medium behind the trait is opaque --
//! in-memory ([`super::MemoryStore`]) or SQLite ([`super::SqliteStore`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, StorageError};
use crate::session::{DistractionStamp, HistoryRecord};
use crate::storage::Preferences;

/// Persisted shape of the in-flight session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub is_active: bool,
    pub is_paused: bool,
    #[serde(default)]
    pub start_epoch_ms: Option<u64>,
    #[serde(default)]
    pub elapsed_secs: u64,
    #[serde(default)]
    pub distraction_count: u32,
    #[serde(default)]
    pub distraction_stamps: Vec<DistractionStamp>,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            is_active: false,
            is_paused: false,
            start_epoch_ms: None,
            elapsed_secs: 0,
            distraction_count: 0,
            distraction_stamps: Vec::new(),
        }
    }
}

/// Everything the store holds, for export/download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub current_session: Option<SessionRecord>,
    pub history: Vec<HistoryRecord>,
    pub preferences: Preferences,
    pub export_date: DateTime<Utc>,
}

/// Abstract store for session, history and preference records.
///
/// Malformed or missing persisted data is treated as absence: loads fall
/// back to `None`/empty/defaults and never fail on decode errors.
pub trait SessionStore {
    fn load_session(&self) -> Result<Option<SessionRecord>, StorageError>;
    fn save_session(&mut self, record: &SessionRecord) -> Result<(), StorageError>;
    fn clear_session(&mut self) -> Result<(), StorageError>;

    fn append_history(&mut self, record: &HistoryRecord) -> Result<(), StorageError>;
    fn load_history(&self) -> Result<Vec<HistoryRecord>, StorageError>;
    fn clear_history(&mut self) -> Result<(), StorageError>;

    fn load_preferences(&self) -> Result<Preferences, StorageError>;
    fn save_preferences(&mut self, prefs: &Preferences) -> Result<(), StorageError>;

    /// Merge a single preference into the persisted record.
    ///
    /// Returns the updated record. Unknown keys and unparseable values are
    /// configuration errors; out-of-range values are clamped.
    fn save_preference(&mut self, key: &str, value: &str) -> Result<Preferences, CoreError> {
        let mut prefs = self.load_preferences()?;
        prefs.set(key, value)?;
        self.save_preferences(&prefs)?;
        Ok(prefs)
    }

    /// Wipe session and history. Preferences survive.
    fn clear_all(&mut self) -> Result<(), StorageError> {
        self.clear_session()?;
        self.clear_history()
    }

    /// Snapshot all records for export/download.
    fn export_all(&self) -> Result<ExportBundle, StorageError> {
        Ok(ExportBundle {
            current_session: self.load_session()?,
            history: self.load_history()?,
            preferences: self.load_preferences()?,
            export_date: Utc::now(),
        })
    }
}

impl SessionRecord {
    /// Record for a live session in the given pause state.
    pub fn in_progress(
        is_paused: bool,
        start_epoch_ms: Option<u64>,
        elapsed_secs: u64,
        distraction_count: u32,
        distraction_stamps: Vec<DistractionStamp>,
    ) -> Self {
        Self {
            is_active: true,
            is_paused,
            start_epoch_ms,
            elapsed_secs,
            distraction_count,
            distraction_stamps,
        }
    }
}
