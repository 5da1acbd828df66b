//! Alert rate limiting.
//!
//! Decides whether a threshold alert may surface right now. Actual
//! presentation (popup, sound, system notification) belongs to the host.
//!
//! This cooldown is independent of the detector cooldown: the detector
//! debounces raw focus signals at signal speed, while the alert gate keeps
//! repeated alerts from stacking up at human speed.

/// Default minimum gap between surfaced alerts, in milliseconds.
pub const DEFAULT_ALERT_COOLDOWN_MS: u64 = 3000;

/// Cooldown gate for outward alerts.
#[derive(Debug, Clone)]
pub struct AlertGate {
    cooldown_ms: u64,
    suppressed_until_ms: Option<u64>,
}

impl AlertGate {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            suppressed_until_ms: None,
        }
    }

    /// Returns true if an alert may fire now, and opens the cooldown window
    /// if so.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if self.suppressed_until_ms.is_some_and(|until| now_ms < until) {
            return false;
        }
        self.suppressed_until_ms = Some(now_ms.saturating_add(self.cooldown_ms));
        true
    }
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_COOLDOWN_MS)
    }
}
