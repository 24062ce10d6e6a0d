//! Machine settings and preferences
//!
//! Stored as JSON next to the binary; never holds session progress.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Tunable machine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Economy ===
    /// Credits loaded at session start
    pub starting_credits: u64,
    /// Jackpot pool at session start
    pub starting_jackpot: u64,
    /// Stake added by one bet press
    pub bet_unit: u64,
    /// Stake added to every symbol by bet-max
    pub max_bet_unit: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_credits: 1000,
            starting_jackpot: 44_227,
            bet_unit: 1,
            max_bet_unit: 10,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Copy with units forced positive and volumes clamped
    pub fn validated(&self) -> Self {
        Self {
            bet_unit: self.bet_unit.max(1),
            max_bet_unit: self.max_bet_unit.max(1),
            master_volume: self.master_volume.clamp(0.0, 1.0),
            sfx_volume: self.sfx_volume.clamp(0.0, 1.0),
            ..self.clone()
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.validated()
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"starting_credits": 50}"#).unwrap();
        assert_eq!(settings.starting_credits, 50);
        assert_eq!(settings.max_bet_unit, 10);
        assert_eq!(settings.starting_jackpot, 44_227);
    }

    #[test]
    fn test_validated_clamps() {
        let settings = Settings {
            bet_unit: 0,
            max_bet_unit: 0,
            master_volume: 3.0,
            sfx_volume: -1.0,
            ..Settings::default()
        }
        .validated();
        assert_eq!(settings.bet_unit, 1);
        assert_eq!(settings.max_bet_unit, 1);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/nonexistent/small-mary.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("small-mary-settings-{}.json", std::process::id()));
        let settings = Settings {
            starting_credits: 250,
            muted: true,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
