//! Monotonic elapsed-time tracking.
//!
//! The clock operates on wall-clock deltas -- no internal thread. Time is
//! read through the [`TimeSource`] seam so hosts and tests can substitute
//! their own source; production code uses [`SystemTimeSource`].

use std::cell::Cell;

/// Millisecond time source injected into the engine.
pub trait TimeSource {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System-clock-backed time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Hand-driven time source for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    ms: Cell<u64>,
}

impl ManualTimeSource {
    pub fn new(start_ms: u64) -> Self {
        Self {
            ms: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.ms.set(ms);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.ms.set(self.ms.get().saturating_add(delta_ms));
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> u64 {
        self.ms.get()
    }
}

/// Virtual start epoch for one session.
///
/// `start` places the epoch `offset_secs` in the past so that pause/resume
/// preserves previously accumulated time: elapsed = (now - epoch) / 1000.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionClock {
    start_epoch_ms: Option<u64>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or resume) counting, crediting `offset_secs` of prior time.
    pub fn start(&mut self, now_ms: u64, offset_secs: u64) {
        self.start_epoch_ms = Some(now_ms.saturating_sub(offset_secs.saturating_mul(1000)));
    }

    /// Freeze the clock. Elapsed time must be captured by the caller first.
    pub fn stop(&mut self) {
        self.start_epoch_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.start_epoch_ms.is_some()
    }

    /// Whole seconds elapsed since the virtual epoch; 0 while stopped.
    pub fn elapsed_secs(&self, now_ms: u64) -> u64 {
        match self.start_epoch_ms {
            Some(epoch) => now_ms.saturating_sub(epoch) / 1000,
            None => 0,
        }
    }

    /// Epoch milliseconds of the virtual start, if running.
    pub fn start_epoch_ms(&self) -> Option<u64> {
        self.start_epoch_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_counts_whole_seconds() {
        let mut clock = SessionClock::new();
        clock.start(10_000, 0);
        assert_eq!(clock.elapsed_secs(10_000), 0);
        assert_eq!(clock.elapsed_secs(10_999), 0);
        assert_eq!(clock.elapsed_secs(11_000), 1);
        assert_eq!(clock.elapsed_secs(15_500), 5);
    }

    #[test]
    fn start_with_offset_credits_prior_time() {
        let mut clock = SessionClock::new();
        clock.start(60_000, 42);
        assert_eq!(clock.elapsed_secs(60_000), 42);
        assert_eq!(clock.elapsed_secs(63_000), 45);
    }

    #[test]
    fn stopped_clock_reports_zero() {
        let mut clock = SessionClock::new();
        assert_eq!(clock.elapsed_secs(99_999), 0);
        clock.start(0, 10);
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed_secs(99_999), 0);
    }

    #[test]
    fn manual_source_advances() {
        let time = ManualTimeSource::new(1_000);
        assert_eq!(time.now_ms(), 1_000);
        time.advance(2_500);
        assert_eq!(time.now_ms(), 3_500);
        time.set(100);
        assert_eq!(time.now_ms(), 100);
    }
}
