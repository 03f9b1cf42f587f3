//! Game settings and preferences
//!
//! Host-side tunables. Native hosts read them from a JSON file, the web
//! bridge receives a JSON string. Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{EFFECT_DURATION_MS, SPLASH_MS};
use crate::error::ConfigError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; `None` lets the host pick one from the clock
    pub seed: Option<u64>,
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Pop explosions
    pub particles: bool,

    // === Timing ===
    /// Splash screen duration (ms)
    pub splash_ms: f64,
    /// Slow-motion / double-score duration (ms)
    pub effect_duration_ms: f64,

    // === Headless driver ===
    /// Synthetic frame length (ms)
    pub frame_ms: f64,
    /// Autoplay reaction time before typing an answer (ms)
    pub autoplay_delay_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            quality: QualityPreset::Medium,
            particles: true,

            splash_ms: SPLASH_MS,
            effect_duration_ms: EFFECT_DURATION_MS,

            frame_ms: 16.0,
            autoplay_delay_ms: 600.0,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.splash_ms, 2500.0);
        assert_eq!(settings.effect_duration_ms, 5000.0);
        assert_eq!(settings.max_particles(), 500);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"seed": 7, "quality": "Low"}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.max_particles(), 100);
        assert_eq!(settings.frame_ms, 16.0);
    }

    #[test]
    fn test_particles_off() {
        let settings = Settings {
            particles: false,
            ..Settings::from_preset(QualityPreset::High)
        };
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            Settings::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Settings::load_from(Path::new("/nonexistent/math-balloon.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
