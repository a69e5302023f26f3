//! Game settings and preferences
//!
//! Persisted separately from records as a small JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistResult;
use crate::tuning::Difficulty;

/// Default settings file name
pub const SETTINGS_FILE: &str = "arena_survivor_settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preselected on the start menu
    pub difficulty: Difficulty,

    // === Visual Effects ===
    /// Screen shake on hits/explosions
    pub screen_shake: bool,
    /// Floating damage numbers
    pub damage_numbers: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            screen_shake: true,
            damage_numbers: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Clamp volumes into range
    pub fn sanitize(&mut self) {
        self.master_volume = clamp_volume(self.master_volume);
        self.sfx_volume = clamp_volume(self.sfx_volume);
    }

    pub fn from_json(json: &str) -> PersistResult<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn read(path: &Path) -> PersistResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn write(&self, path: &Path) -> PersistResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load settings, using defaults if the file is missing or corrupt
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save(&self, path: &Path) {
        match self.write(path) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

fn clamp_volume(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"difficulty":"Hard","sfx_volume":3.0}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.master_volume, 0.8);
        assert!(settings.mute_on_blur);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("arena_survivor_no_such_settings.json");
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("arena_survivor_settings_{}.json", std::process::id()));
        let settings = Settings {
            difficulty: Difficulty::Easy,
            reduced_motion: true,
            master_volume: 0.3,
            ..Default::default()
        };
        settings.write(&path).unwrap();
        assert_eq!(Settings::read(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);
    }
}
