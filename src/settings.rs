//! Game settings
//!
//! Loaded from an optional JSON file; anything missing falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, TICK_MS};
use crate::sim::{SessionConfig, Variant};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical screen size in pixels, fixed per session
    pub screen_width: i32,
    pub screen_height: i32,
    /// Entity taxonomy and level policy
    pub variant: Variant,
    /// Run seed; a clock-derived seed is used when absent
    pub seed: Option<u64>,
    /// Simulation timestep (ms)
    pub tick_ms: u32,

    // === Audio ===
    pub sound_effects: bool,
    pub music: bool,
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            variant: Variant::Full,
            seed: None,
            tick_ms: TICK_MS,
            sound_effects: true,
            music: true,
            muted: false,
            master_volume: 0.8,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Some(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            None => {
                log::warn!("Ignoring malformed settings in {}", path.display());
                Self::default()
            }
        }
    }

    /// Parse and sanitize settings JSON
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => Some(settings.sanitized()),
            Err(e) => {
                log::warn!("Settings parse error: {}", e);
                None
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Clamp values the game cannot run with
    pub fn sanitized(mut self) -> Self {
        self.screen_width = self.screen_width.max(1);
        self.screen_height = self.screen_height.max(1);
        self.tick_ms = self.tick_ms.max(1);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self
    }

    /// Fixed configuration for a new session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            variant: self.variant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "variant": "classic", "seed": 9 }"#).unwrap();
        assert_eq!(settings.variant, Variant::Classic);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.screen_width, DEFAULT_SCREEN_WIDTH);
        assert_eq!(settings.tick_ms, TICK_MS);
    }

    #[test]
    fn test_malformed_json() {
        assert!(Settings::from_json("{ not json").is_none());
        assert!(Settings::from_json(r#"{ "variant": "turbo" }"#).is_none());
    }

    #[test]
    fn test_sanitize() {
        let settings =
            Settings::from_json(r#"{ "screen_width": -5, "tick_ms": 0, "master_volume": 3.0 }"#)
                .unwrap();
        assert_eq!(settings.screen_width, 1);
        assert_eq!(settings.tick_ms, 1);
        assert_eq!(settings.master_volume, 1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            seed: Some(5),
            ..Default::default()
        };
        assert_eq!(Settings::from_json(&settings.to_json()), Some(settings));
    }

    #[test]
    fn test_missing_file_defaults() {
        let settings = Settings::load("/definitely/not/here/hippo.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_session_config() {
        let settings = Settings {
            screen_width: 800,
            screen_height: 600,
            variant: Variant::Classic,
            ..Default::default()
        };
        let config = settings.session_config();
        assert_eq!(config.screen_width, 800);
        assert_eq!(config.screen_height, 600);
        assert_eq!(config.variant, Variant::Classic);
    }
}
