mod config;
pub mod database;
mod gateway;
mod memory;
pub mod preferences;

pub use config::Config;
pub use database::SqliteStore;
pub use gateway::{ExportBundle, SessionRecord, SessionStore};
pub use memory::MemoryStore;
pub use preferences::{Preferences, Theme};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `FOCUSBUBBLE_DATA_DIR` overrides the location entirely (tests point it
/// at a temp dir). Otherwise `~/.config/focusbubble[-dev]` based on
/// `FOCUSBUBBLE_ENV`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var("FOCUSBUBBLE_DATA_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSBUBBLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusbubble-dev")
            } else {
                base_dir.join("focusbubble")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
