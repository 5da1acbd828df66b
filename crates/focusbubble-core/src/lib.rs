//! # FocusBubble Core Library
//!
//! This library provides the core business logic for the FocusBubble focus
//! timer. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any GUI being a thin layer
//! over the same core library.
//!
//! ## Architecture
//!
//! - **Session Engine**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` for progress updates
//! - **Distraction Detector**: Debounces raw focus/blur signals into counted
//!   distraction events with a cooldown window
//! - **Storage**: SQLite-based session/history storage and TOML-based
//!   component configuration
//! - **App**: Orchestrator wiring the engine, detector and storage together
//!   and notifying host-registered observers
//!
//! ## Key Components
//!
//! - [`SessionState`]: Core session state machine
//! - [`DistractionDetector`]: Focus-signal debouncer
//! - [`App`]: Application context object (no ambient singletons)
//! - [`SqliteStore`]: Session, history and preferences persistence

pub mod alerts;
pub mod app;
pub mod clock;
pub mod detector;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;

pub use alerts::AlertGate;
pub use app::{App, Observers};
pub use clock::{ManualTimeSource, SessionClock, SystemTimeSource, TimeSource};
pub use detector::{DistractionDetector, DistractionEvent};
pub use error::{ConfigError, CoreError, Result, StorageError};
pub use events::Event;
pub use session::{DistractionStamp, HistoryRecord, SessionPhase, SessionState};
pub use stats::FocusStats;
pub use storage::{
    Config, MemoryStore, Preferences, SessionRecord, SessionStore, SqliteStore, Theme,
};
