//! Focus statistics derivation and display formatting.
//!
//! Everything here is a pure function of its inputs; callers may recompute
//! at any frequency.

use serde::{Deserialize, Serialize};

/// Fixed per-distraction time cost in seconds.
///
/// A deliberate approximation, not measured dwell time: each counted
/// distraction is assumed to cost this much focus.
pub const DEFAULT_DISTRACTION_COST_SECS: u64 = 15;

/// `max(0, duration - count * cost)`.
pub fn estimated_focus_secs(duration_secs: u64, distraction_count: u32, cost_secs: u64) -> u64 {
    duration_secs.saturating_sub(u64::from(distraction_count).saturating_mul(cost_secs))
}

/// Derived statistics for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusStats {
    pub elapsed_secs: u64,
    pub distraction_count: u32,
    pub estimated_distraction_secs: u64,
    pub focus_secs: u64,
    /// Rounded percentage of elapsed time estimated as focused.
    /// A zero-length session reports 100 (no data yet reads as neutral).
    pub focus_ratio_pct: u32,
}

impl FocusStats {
    pub fn compute(elapsed_secs: u64, distraction_count: u32, cost_secs: u64) -> Self {
        let estimated_distraction_secs = u64::from(distraction_count).saturating_mul(cost_secs);
        let focus_secs = elapsed_secs.saturating_sub(estimated_distraction_secs);
        let focus_ratio_pct = if elapsed_secs > 0 {
            ((focus_secs as f64 / elapsed_secs as f64) * 100.0).round() as u32
        } else {
            100
        };
        Self {
            elapsed_secs,
            distraction_count,
            estimated_distraction_secs,
            focus_secs,
            focus_ratio_pct,
        }
    }
}

/// Format seconds as `mm:ss` (minutes are not capped at 59).
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format seconds as a human-readable duration.
pub fn format_duration(total_secs: u64) -> String {
    if total_secs < 60 {
        return format!("{total_secs} seconds");
    }
    let plural = |n: u64| if n == 1 { "" } else { "s" };
    if total_secs < 3600 {
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        if seconds > 0 {
            format!(
                "{minutes} minute{} and {seconds} second{}",
                plural(minutes),
                plural(seconds)
            )
        } else {
            format!("{minutes} minute{}", plural(minutes))
        }
    } else {
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        if minutes > 0 {
            format!(
                "{hours} hour{} and {minutes} minute{}",
                plural(hours),
                plural(minutes)
            )
        } else {
            format!("{hours} hour{}", plural(hours))
        }
    }
}
