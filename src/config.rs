//! Field configuration and the settings file.
//!
//! [`FieldConfig`] fixes the simulation's invariants for the lifetime of a
//! [`ParticleField`](crate::ParticleField). It can only be built through
//! [`FieldConfig::new`] or [`Default`], so an instance in hand is always valid.
//!
//! [`Settings`] bundles the field configuration with its visual style and is
//! what the native binary reads from disk:
//!
//! ```json
//! {
//!   "field": { "count": 60, "linkDist": 140.0, "maxSpeed": 0.35 },
//!   "style": { "point_alpha": 0.8 },
//!   "title": "Particle Field"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::visuals::FieldStyle;

/// Default number of particles.
pub const DEFAULT_COUNT: u32 = 60;
/// Default link distance threshold in logical pixels.
pub const DEFAULT_LINK_DIST: f32 = 140.0;
/// Default per-axis speed cap in logical pixels per frame.
pub const DEFAULT_MAX_SPEED: f32 = 0.35;

/// Immutable particle field configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawFieldConfig")]
pub struct FieldConfig {
    count: u32,
    link_dist: f32,
    max_speed: f32,
}

impl FieldConfig {
    /// Build a validated configuration.
    ///
    /// `count` must be at least 1, `link_dist` and `max_speed` must be finite
    /// and strictly positive.
    pub fn new(count: u32, link_dist: f32, max_speed: f32) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::Invalid("count must be at least 1".into()));
        }
        if !(link_dist.is_finite() && link_dist > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "linkDist must be a positive number, got {}",
                link_dist
            )));
        }
        if !(max_speed.is_finite() && max_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "maxSpeed must be a positive number, got {}",
                max_speed
            )));
        }
        Ok(Self {
            count,
            link_dist,
            max_speed,
        })
    }

    /// Number of particles in the population.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Proximity threshold below which two particles are linked.
    #[inline]
    pub fn link_dist(&self) -> f32 {
        self.link_dist
    }

    /// Per-axis velocity cap.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            link_dist: DEFAULT_LINK_DIST,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }
}

/// Unvalidated wire form; missing keys take the defaults.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFieldConfig {
    count: u32,
    link_dist: f32,
    max_speed: f32,
}

impl Default for RawFieldConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            link_dist: DEFAULT_LINK_DIST,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }
}

impl TryFrom<RawFieldConfig> for FieldConfig {
    type Error = ConfigError;

    fn try_from(raw: RawFieldConfig) -> Result<Self, Self::Error> {
        FieldConfig::new(raw.count, raw.link_dist, raw.max_speed)
    }
}

fn default_title() -> String {
    "Particle Field".into()
}

/// Everything the native viewer needs to start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub style: FieldStyle,
    /// Window title.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            style: FieldStyle::default(),
            title: default_title(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_script() {
        let config = FieldConfig::default();
        assert_eq!(config.count(), 60);
        assert_eq!(config.link_dist(), 140.0);
        assert_eq!(config.max_speed(), 0.35);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(FieldConfig::new(0, 140.0, 0.35).is_err());
        assert!(FieldConfig::new(10, 0.0, 0.35).is_err());
        assert!(FieldConfig::new(10, -3.0, 0.35).is_err());
        assert!(FieldConfig::new(10, 140.0, f32::NAN).is_err());
        assert!(FieldConfig::new(10, f32::INFINITY, 0.35).is_err());
        assert!(FieldConfig::new(1, 0.5, 0.01).is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: FieldConfig = serde_json::from_str(r#"{ "linkDist": 90 }"#).unwrap();
        assert_eq!(config.count(), 60);
        assert_eq!(config.link_dist(), 90.0);
        assert_eq!(config.max_speed(), 0.35);
    }

    #[test]
    fn test_invalid_json_value_is_rejected() {
        let result: Result<FieldConfig, _> = serde_json::from_str(r#"{ "count": 0 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_with_page_option_names() {
        let json = serde_json::to_value(FieldConfig::default()).unwrap();
        assert_eq!(json["count"], 60);
        assert!(json.get("linkDist").is_some());
        assert!(json.get("maxSpeed").is_some());
    }

    #[test]
    fn test_settings_from_empty_object() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "particle-field-settings-{}.json",
            std::process::id()
        ));
        let settings = Settings {
            field: FieldConfig::new(12, 80.0, 0.5).unwrap(),
            title: "Preview".into(),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
