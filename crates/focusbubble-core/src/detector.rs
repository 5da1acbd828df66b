//! Distraction detection from raw focus signals.
//!
//! Hosts deliver a stream of boolean focus signals (tab visibility, window
//! blur/focus -- whatever the environment provides). A single real focus
//! loss can generate several rapid low-level signals; the detector collapses
//! them into exactly one counted distraction per cooldown window. Focus
//! regain is never rate-limited, so observers recover immediately.
//!
//! Like the session engine, the cooldown is a wall-clock deadline checked
//! against the injected time source -- no internal timer.

use serde::{Deserialize, Serialize};

/// Default cooldown between counted distractions, in milliseconds.
pub const DEFAULT_COOLDOWN_MS: u64 = 1000;

/// Debounced output of the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistractionEvent {
    /// Focus was lost; count one distraction.
    Started,
    /// Focus returned after a loss.
    Ended,
}

/// Converts raw focus/blur signals into debounced distraction events.
///
/// Internal state is never persisted; it is reset each time tracking starts.
#[derive(Debug, Clone)]
pub struct DistractionDetector {
    tracking: bool,
    last_focused: bool,
    /// Deadline after which a new distraction may be counted again.
    cooldown_until_ms: Option<u64>,
    cooldown_ms: u64,
}

impl DistractionDetector {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            tracking: false,
            last_focused: true,
            cooldown_until_ms: None,
            cooldown_ms,
        }
    }

    /// Begin tracking. `currently_focused` seeds the last-known focus state
    /// so the very first signal does not register a spurious transition.
    pub fn start_tracking(&mut self, currently_focused: bool) {
        self.tracking = true;
        self.last_focused = currently_focused;
        self.cooldown_until_ms = None;
    }

    pub fn stop_tracking(&mut self) {
        self.tracking = false;
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    fn in_cooldown(&self, now_ms: u64) -> bool {
        self.cooldown_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Feed one raw focus signal. Returns the debounced event, if any.
    ///
    /// Redundant same-state signals (e.g. a visibility change and a window
    /// blur firing for one real transition) are absorbed. A focus loss
    /// inside the cooldown window is suppressed; a focus regain is not.
    pub fn on_focus_change(&mut self, now_ms: u64, is_focused: bool) -> Option<DistractionEvent> {
        if !self.tracking {
            return None;
        }
        if is_focused == self.last_focused {
            return None;
        }
        self.last_focused = is_focused;

        if is_focused {
            return Some(DistractionEvent::Ended);
        }
        if self.in_cooldown(now_ms) {
            return None;
        }
        self.cooldown_until_ms = Some(now_ms.saturating_add(self.cooldown_ms));
        Some(DistractionEvent::Started)
    }
}

impl Default for DistractionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_unfocused_signal_is_absorbed() {
        let mut detector = DistractionDetector::default();
        detector.start_tracking(true);

        // visibility-change and window-blur both fire for one real loss
        assert_eq!(
            detector.on_focus_change(0, false),
            Some(DistractionEvent::Started)
        );
        assert_eq!(detector.on_focus_change(50, false), None);
        assert_eq!(
            detector.on_focus_change(500, true),
            Some(DistractionEvent::Ended)
        );
    }

    #[test]
    fn flicker_within_cooldown_counts_once() {
        let mut detector = DistractionDetector::default();
        detector.start_tracking(true);

        assert_eq!(
            detector.on_focus_change(0, false),
            Some(DistractionEvent::Started)
        );
        assert_eq!(
            detector.on_focus_change(200, true),
            Some(DistractionEvent::Ended)
        );
        // Second loss inside the 1s window is suppressed.
        assert_eq!(detector.on_focus_change(400, false), None);
        assert_eq!(
            detector.on_focus_change(600, true),
            Some(DistractionEvent::Ended)
        );
    }

    #[test]
    fn new_distraction_after_cooldown_expires() {
        let mut detector = DistractionDetector::default();
        detector.start_tracking(true);

        assert_eq!(
            detector.on_focus_change(0, false),
            Some(DistractionEvent::Started)
        );
        assert_eq!(
            detector.on_focus_change(300, true),
            Some(DistractionEvent::Ended)
        );
        assert_eq!(
            detector.on_focus_change(1500, false),
            Some(DistractionEvent::Started)
        );
    }

    #[test]
    fn signals_ignored_while_not_tracking() {
        let mut detector = DistractionDetector::default();
        assert_eq!(detector.on_focus_change(0, false), None);

        detector.start_tracking(true);
        detector.stop_tracking();
        assert_eq!(detector.on_focus_change(0, false), None);
    }

    #[test]
    fn start_tracking_seeds_focus_state() {
        let mut detector = DistractionDetector::default();
        // Tracking starts while already unfocused: the matching signal is
        // not a transition.
        detector.start_tracking(false);
        assert_eq!(detector.on_focus_change(0, false), None);
        assert_eq!(
            detector.on_focus_change(100, true),
            Some(DistractionEvent::Ended)
        );
    }

    #[test]
    fn restart_clears_cooldown() {
        let mut detector = DistractionDetector::default();
        detector.start_tracking(true);
        assert_eq!(
            detector.on_focus_change(0, false),
            Some(DistractionEvent::Started)
        );

        detector.stop_tracking();
        detector.start_tracking(true);
        assert_eq!(
            detector.on_focus_change(100, false),
            Some(DistractionEvent::Started)
        );
    }
}
