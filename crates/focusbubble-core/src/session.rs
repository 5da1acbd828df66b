//! Session lifecycle state machine.
//!
//! The engine is wall-clock based and has no internal thread: every command
//! takes the current time in milliseconds and the caller (normally
//! [`crate::app::App`]) reads it from the injected time source.
//!
//! ## State Transitions
//!
//! ```text
//! Inactive -> Active -> Paused -> Active -> ... -> Inactive
//! ```
//!
//! Invalid transitions (e.g. `pause()` while Inactive) are silent no-ops:
//! they return `None`, mutate nothing and trigger no persistence writes.
//! Callers are expected to disable the corresponding controls, but the
//! machine itself stays defensive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::SessionClock;
use crate::events::Event;
use crate::stats;

/// Lifecycle phase of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Inactive,
    Active,
    Paused,
}

/// One counted distraction: when it happened and the running count after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistractionStamp {
    pub at_epoch_ms: u64,
    pub count: u32,
}

/// Immutable snapshot of a completed session, archived into history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Completion timestamp.
    pub date: DateTime<Utc>,
    pub duration_secs: u64,
    pub distraction_count: u32,
    pub distraction_stamps: Vec<DistractionStamp>,
    /// `max(0, duration - count * per-distraction cost)`.
    pub estimated_focus_secs: u64,
}

impl HistoryRecord {
    pub fn new(
        date: DateTime<Utc>,
        duration_secs: u64,
        distraction_count: u32,
        distraction_stamps: Vec<DistractionStamp>,
        cost_secs: u64,
    ) -> Self {
        Self {
            date,
            duration_secs,
            distraction_count,
            distraction_stamps,
            estimated_focus_secs: stats::estimated_focus_secs(
                duration_secs,
                distraction_count,
                cost_secs,
            ),
        }
    }
}

/// Core session state machine.
///
/// Owns the session clock and the accumulated distraction counters.
/// Commands return `Some(Event)` on a valid transition and `None` otherwise.
#[derive(Debug, Clone)]
pub struct SessionState {
    phase: SessionPhase,
    clock: SessionClock,
    /// Elapsed seconds captured when the clock was last frozen.
    frozen_elapsed_secs: u64,
    distraction_count: u32,
    stamps: Vec<DistractionStamp>,
    max_distractions: u32,
    distraction_cost_secs: u64,
}

impl SessionState {
    pub fn new(max_distractions: u32, distraction_cost_secs: u64) -> Self {
        Self {
            phase: SessionPhase::Inactive,
            clock: SessionClock::new(),
            frozen_elapsed_secs: 0,
            distraction_count: 0,
            stamps: Vec::new(),
            max_distractions: max_distractions.max(1),
            distraction_cost_secs,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn elapsed_secs(&self, now_ms: u64) -> u64 {
        match self.phase {
            SessionPhase::Active => self.clock.elapsed_secs(now_ms),
            _ => self.frozen_elapsed_secs,
        }
    }

    pub fn distraction_count(&self) -> u32 {
        self.distraction_count
    }

    pub fn distraction_stamps(&self) -> &[DistractionStamp] {
        &self.stamps
    }

    pub fn max_distractions(&self) -> u32 {
        self.max_distractions
    }

    /// Epoch milliseconds of the virtual session start, while Active.
    pub fn start_epoch_ms(&self) -> Option<u64> {
        self.clock.start_epoch_ms()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        let elapsed = self.elapsed_secs(now_ms);
        let stats =
            stats::FocusStats::compute(elapsed, self.distraction_count, self.distraction_cost_secs);
        Event::StateSnapshot {
            phase: self.phase,
            elapsed_secs: elapsed,
            distraction_count: self.distraction_count,
            focus_secs: stats.focus_secs,
            distraction_secs: stats.estimated_distraction_secs,
            focus_ratio_pct: stats.focus_ratio_pct,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh session. Valid only from Inactive.
    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        match self.phase {
            SessionPhase::Inactive => {
                self.phase = SessionPhase::Active;
                self.frozen_elapsed_secs = 0;
                self.distraction_count = 0;
                self.stamps.clear();
                self.clock.start(now_ms, 0);
                Some(Event::SessionStarted { at: Utc::now() })
            }
            _ => None,
        }
    }

    /// Freeze elapsed time. Valid only from Active.
    pub fn pause(&mut self, now_ms: u64) -> Option<Event> {
        match self.phase {
            SessionPhase::Active => {
                self.frozen_elapsed_secs = self.clock.elapsed_secs(now_ms);
                self.clock.stop();
                self.phase = SessionPhase::Paused;
                Some(Event::SessionPaused {
                    elapsed_secs: self.frozen_elapsed_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Restart the clock, crediting the frozen time. Valid only from Paused.
    pub fn resume(&mut self, now_ms: u64) -> Option<Event> {
        match self.phase {
            SessionPhase::Paused => {
                self.clock.start(now_ms, self.frozen_elapsed_secs);
                self.phase = SessionPhase::Active;
                Some(Event::SessionResumed {
                    elapsed_secs: self.frozen_elapsed_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Discard the session without archiving. Valid from any phase.
    pub fn reset(&mut self) -> Option<Event> {
        self.phase = SessionPhase::Inactive;
        self.clock.stop();
        self.frozen_elapsed_secs = 0;
        self.distraction_count = 0;
        self.stamps.clear();
        Some(Event::SessionReset { at: Utc::now() })
    }

    /// Count one distraction. Valid only while Active.
    ///
    /// The emitted event carries `threshold_reached` exactly on the
    /// increment that makes the count equal the configured maximum, so the
    /// alert fires once per crossing and not on further increments.
    pub fn record_distraction(&mut self, now_ms: u64) -> Option<Event> {
        match self.phase {
            SessionPhase::Active => {
                self.distraction_count += 1;
                self.stamps.push(DistractionStamp {
                    at_epoch_ms: now_ms,
                    count: self.distraction_count,
                });
                Some(Event::DistractionRecorded {
                    count: self.distraction_count,
                    threshold_reached: self.distraction_count == self.max_distractions,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Archive the session into a [`HistoryRecord`] and return to Inactive.
    /// Valid from Active or Paused.
    pub fn complete(&mut self, now_ms: u64) -> Option<HistoryRecord> {
        match self.phase {
            SessionPhase::Active | SessionPhase::Paused => {
                let record = HistoryRecord::new(
                    Utc::now(),
                    self.elapsed_secs(now_ms),
                    self.distraction_count,
                    self.stamps.clone(),
                    self.distraction_cost_secs,
                );
                self.reset();
                Some(record)
            }
            SessionPhase::Inactive => None,
        }
    }

    // ── Restoration ──────────────────────────────────────────────────

    /// Re-hydrate a persisted session: enter `phase` with `elapsed_secs`
    /// already on the clock and the given counters. Used at startup.
    pub fn restore(
        &mut self,
        now_ms: u64,
        phase: SessionPhase,
        elapsed_secs: u64,
        stamps: Vec<DistractionStamp>,
    ) {
        self.distraction_count = stamps.len() as u32;
        self.stamps = stamps;
        self.frozen_elapsed_secs = elapsed_secs;
        self.phase = phase;
        match phase {
            SessionPhase::Active => self.clock.start(now_ms, elapsed_secs),
            _ => self.clock.stop(),
        }
    }

    /// Apply a changed preference mid-session. Values below 1 are clamped.
    pub fn set_max_distractions(&mut self, max: u32) {
        self.max_distractions = max.max(1);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(
            crate::storage::preferences::DEFAULT_MAX_DISTRACTIONS,
            stats::DEFAULT_DISTRACTION_COST_SECS,
        )
    }
}
