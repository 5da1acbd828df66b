//! TOML-based component configuration.
//!
//! Tunable constants that are not user preferences:
//! - Detector cooldown (collapses rapid focus-loss signals)
//! - Alert cooldown (rate-limits surfaced alerts)
//! - Per-distraction focus cost used by the statistics
//!
//! The two cooldowns are independent knobs and must not be conflated: one
//! operates at signal speed, the other at human speed.
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Distraction detector tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default = "default_detector_cooldown_ms")]
    pub cooldown_ms: u64,
}

/// Alert gate tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_alert_cooldown_ms")]
    pub cooldown_ms: u64,
}

/// Statistics tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_distraction_cost_secs")]
    pub distraction_cost_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

fn default_detector_cooldown_ms() -> u64 {
    crate::detector::DEFAULT_COOLDOWN_MS
}
fn default_alert_cooldown_ms() -> u64 {
    crate::alerts::DEFAULT_ALERT_COOLDOWN_MS
}
fn default_distraction_cost_secs() -> u64 {
    crate::stats::DEFAULT_DISTRACTION_COST_SECS
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_detector_cooldown_ms(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_alert_cooldown_ms(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            distraction_cost_secs: default_distraction_cost_secs(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("<data dir>"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.detector.cooldown_ms, 1000);
        assert_eq!(parsed.alerts.cooldown_ms, 3000);
        assert_eq!(parsed.stats.distraction_cost_secs, 15);
    }

    #[test]
    fn missing_sections_fill_from_defaults() {
        let parsed: Config = toml::from_str("[detector]\ncooldown_ms = 250\n").unwrap();
        assert_eq!(parsed.detector.cooldown_ms, 250);
        assert_eq!(parsed.alerts.cooldown_ms, 3000);
        assert_eq!(parsed.stats.distraction_cost_secs, 15);
    }

    #[test]
    fn cooldowns_are_independent_knobs() {
        let parsed: Config =
            toml::from_str("[detector]\ncooldown_ms = 500\n\n[alerts]\ncooldown_ms = 60000\n")
                .unwrap();
        assert_eq!(parsed.detector.cooldown_ms, 500);
        assert_eq!(parsed.alerts.cooldown_ms, 60000);
    }
}
