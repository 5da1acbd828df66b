use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionPhase;

/// Every state change in the system produces an Event.
/// Hosts poll for events or receive them through registered observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// A focus loss was counted. `threshold_reached` is set exactly on the
    /// increment that makes the count equal the configured maximum.
    DistractionRecorded {
        count: u32,
        threshold_reached: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: SessionPhase,
        elapsed_secs: u64,
        distraction_count: u32,
        focus_secs: u64,
        distraction_secs: u64,
        focus_ratio_pct: u32,
        at: DateTime<Utc>,
    },
}
