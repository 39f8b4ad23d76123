//! Game settings and preferences
//!
//! Persisted separately from match history in LocalStorage on the web, read
//! from an optional JSON file on native.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Difficulty, GameConfig, PhysicsConfig, Targeting};

/// Failure reading or validating user-authored settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Opponent strength
    pub difficulty: Difficulty,
    /// Player two is driven by the computer
    pub vs_computer: bool,
    /// How the computer picks where to stand
    pub targeting: Targeting,

    /// Court, body sizes and match length
    pub game: GameConfig,
    /// Physics tuning
    pub physics: PhysicsConfig,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Pause when the tab is hidden or the window loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            vs_computer: true,
            targeting: Targeting::default(),
            game: GameConfig::default(),
            physics: PhysicsConfig::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject geometry the simulation cannot run with
    ///
    /// Collision resolution divides by mass and distance, a player must fit
    /// on its half of the court, and the physics factors must not add energy.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let game = &self.game;
        let court = &game.court;

        let positive = [
            ("court.width", court.width),
            ("court.height", court.height),
            ("playerRadius", game.player_radius),
            ("playerMass", game.player_mass),
            ("ballRadius", game.ball_radius),
            ("ballMass", game.ball_mass),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SettingsError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if court.net_width < 0.0 || court.net_height < 0.0 || court.net_height >= court.height {
            return Err(SettingsError::Invalid("net does not fit the court".into()));
        }
        if court.net_left() < 2.0 * game.player_radius {
            return Err(SettingsError::Invalid("player does not fit on its half".into()));
        }
        if game.points_to_win == 0 {
            return Err(SettingsError::Invalid("pointsToWin must be at least 1".into()));
        }

        let physics = &self.physics;
        let non_negative = [
            ("physics.gravity", physics.gravity),
            ("physics.jumpForce", physics.jump_force),
            ("physics.moveSpeed", physics.move_speed),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        // Factors above 1 feed energy back in and the simulation diverges
        let unit = [
            ("physics.playerRestitution", physics.player_restitution),
            ("physics.ballRestitution", physics.ball_restitution),
            ("physics.springStiffness", physics.spring_stiffness),
            ("physics.springDamping", physics.spring_damping),
            ("physics.friction", physics.friction),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "jelly_volley_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring saved settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{"difficulty":"Hard","game":{"pointsToWin":3}}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.game.points_to_win, 3);
        assert_eq!(settings.game.court, GameConfig::default().court);
        assert!(settings.vs_computer);
    }

    #[test]
    fn test_rejects_zero_mass() {
        let err = Settings::from_json(r#"{"game":{"ballMass":0.0}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_points() {
        let err = Settings::from_json(r#"{"game":{"pointsToWin":0}}"#).unwrap_err();
        assert!(err.to_string().contains("pointsToWin"));
    }

    #[test]
    fn test_rejects_runaway_physics() {
        let err = Settings::from_json(r#"{"physics":{"springDamping":1.5}}"#).unwrap_err();
        assert!(err.to_string().contains("springDamping"));
        let err = Settings::from_json(r#"{"physics":{"friction":2.0}}"#).unwrap_err();
        assert!(err.to_string().contains("friction"));
        assert!(Settings::from_json(r#"{"physics":{"gravity":-0.5}}"#).is_err());
        assert!(Settings::from_json(r#"{"physics":{"ballRestitution":1.0}}"#).is_ok());
    }

    #[test]
    fn test_targeting_is_configurable() {
        let settings = Settings::from_json(r#"{"targeting":"Shadow"}"#).unwrap();
        assert_eq!(settings.targeting, Targeting::Shadow);
        assert_eq!(Settings::default().targeting, Targeting::default());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Settings::from_json_file("/definitely/not/here.json"),
            Err(SettingsError::Io(_))
        ));
    }
}
