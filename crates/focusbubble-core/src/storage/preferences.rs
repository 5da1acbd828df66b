//! User preferences record.
//!
//! Persisted through the [`super::SessionStore`] gateway as one logical
//! record. Missing fields fill from defaults on load; out-of-range values
//! are clamped before they reach the core.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DISTRACTIONS: u32 = 3;
pub const DEFAULT_VOLUME: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_max_distractions")]
    pub max_distractions: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_volume")]
    pub volume: f64,
}

fn default_max_distractions() -> u32 {
    DEFAULT_MAX_DISTRACTIONS
}
fn default_true() -> bool {
    true
}
fn default_volume() -> f64 {
    DEFAULT_VOLUME
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            max_distractions: DEFAULT_MAX_DISTRACTIONS,
            sound_enabled: true,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl Preferences {
    /// Clamp fields into their valid ranges.
    pub fn normalize(&mut self) {
        self.max_distractions = self.max_distractions.max(1);
        self.volume = self.volume.clamp(0.0, 1.0);
    }

    /// Decode a persisted record, falling back to defaults on malformed
    /// data. Never fails.
    pub fn from_json_or_default(json: &str) -> Self {
        let mut prefs: Preferences = serde_json::from_str(json).unwrap_or_default();
        prefs.normalize();
        prefs
    }

    /// Read one field as a display string.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "theme" => Some(self.theme.as_str().to_string()),
            "max_distractions" => Some(self.max_distractions.to_string()),
            "sound_enabled" => Some(self.sound_enabled.to_string()),
            "volume" => Some(self.volume.to_string()),
            _ => None,
        }
    }

    /// Update one field from a string value, clamping out-of-range input.
    ///
    /// # Errors
    /// Returns an error for unknown keys or unparseable values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError;

        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        match key {
            "theme" => {
                self.theme = match value {
                    "light" => Theme::Light,
                    "dark" => Theme::Dark,
                    _ => return Err(invalid("expected 'light' or 'dark'")),
                };
            }
            "max_distractions" => {
                let n: u32 = value.parse().map_err(|_| invalid("expected an integer"))?;
                self.max_distractions = n.max(1);
            }
            "sound_enabled" => {
                self.sound_enabled = value
                    .parse()
                    .map_err(|_| invalid("expected 'true' or 'false'"))?;
            }
            "volume" => {
                let v: f64 = value.parse().map_err(|_| invalid("expected a number"))?;
                self.volume = v.clamp(0.0, 1.0);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Keys accepted by [`Preferences::set`], in display order.
    pub fn keys() -> &'static [&'static str] {
        &["theme", "max_distractions", "sound_enabled", "volume"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.max_distractions, 3);
        assert!(prefs.sound_enabled);
        assert_eq!(prefs.volume, 0.5);
    }

    #[test]
    fn missing_fields_fill_from_defaults() {
        let prefs = Preferences::from_json_or_default(r#"{"theme":"dark"}"#);
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.max_distractions, 3);
        assert_eq!(prefs.volume, 0.5);
    }

    #[test]
    fn malformed_record_reads_as_defaults() {
        assert_eq!(
            Preferences::from_json_or_default("not json"),
            Preferences::default()
        );
        assert_eq!(Preferences::from_json_or_default(""), Preferences::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let prefs = Preferences::from_json_or_default(r#"{"max_distractions":0,"volume":1.7}"#);
        assert_eq!(prefs.max_distractions, 1);
        assert_eq!(prefs.volume, 1.0);
    }

    #[test]
    fn set_updates_and_clamps() {
        let mut prefs = Preferences::default();
        prefs.set("theme", "dark").unwrap();
        prefs.set("volume", "0.3").unwrap();
        prefs.set("max_distractions", "0").unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.volume, 0.3);
        assert_eq!(prefs.max_distractions, 1);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut prefs = Preferences::default();
        assert!(prefs.set("nonexistent", "1").is_err());
        assert!(prefs.set("volume", "loud").is_err());
        assert!(prefs.set("theme", "solarized").is_err());
        assert_eq!(prefs, Preferences::default());
    }
}
