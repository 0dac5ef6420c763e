//! Aggregate Configuration
//!
//! Everything tunable lives in one serde-backed struct. Defaults mirror a
//! sensible small arena (60 s round, 15 coins over a 40×40 footprint);
//! embedders can load overrides from a JSON file. Validation catches value
//! ranges the gameplay code assumes; everything else is a playstyle choice.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::hooks::PrefabRef;
use crate::game::camera::CameraConfig;
use crate::game::coordinator::RoundConfig;
use crate::game::spawner::SpawnerConfig;
use crate::game::theme::{ThemeCatalog, ThemeDefinition};

/// How a host reacts to `request_shutdown`.
///
/// One abstraction, selected per embedding at configuration time, not a
/// compile-time platform switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShutdownMode {
    /// Latch a flag for the embedder to inspect (interactive harness)
    #[default]
    Harness,
    /// End the run loop outright (standalone run)
    Standalone,
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values are out of range or inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for target picks and placement streams
    pub seed: u64,

    /// Round coordinator settings
    pub round: RoundConfig,

    /// Coin spawner settings
    pub spawner: SpawnerConfig,

    /// Chase camera settings
    pub camera: CameraConfig,

    /// Theme catalog (actor/pursuer pairs plus spawn points)
    pub themes: ThemeCatalog,

    /// Shutdown behavior of the host embedding
    pub shutdown: ShutdownMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x0C01_1EC7,
            round: RoundConfig::default(),
            spawner: SpawnerConfig::default(),
            camera: CameraConfig::default(),
            themes: ThemeCatalog {
                themes: vec![
                    ThemeDefinition {
                        name: "Classic".to_owned(),
                        actor_prefab: PrefabRef::new("actor_classic"),
                        pursuer_prefab: PrefabRef::new("pursuer_classic"),
                    },
                    ThemeDefinition {
                        name: "Neon".to_owned(),
                        actor_prefab: PrefabRef::new("actor_neon"),
                        pursuer_prefab: PrefabRef::new("pursuer_neon"),
                    },
                ],
                actor_spawn: Vec3::new(0.0, 0.5, 0.0),
                pursuer_spawn: Vec3::new(12.0, 0.5, 12.0),
            },
            shutdown: ShutdownMode::default(),
        }
    }
}

impl GameConfig {
    /// Load and validate a config from a JSON file. Missing fields fall
    /// back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the value ranges the gameplay code assumes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round.start_time_seconds <= 0.0 {
            return Err(ConfigError::Invalid(
                "round.start_time_seconds must be positive".to_owned(),
            ));
        }
        if self.round.sweep_interval <= 0.0 {
            return Err(ConfigError::Invalid(
                "round.sweep_interval must be positive".to_owned(),
            ));
        }
        if self.spawner.min_spacing < 0.0 {
            return Err(ConfigError::Invalid(
                "spawner.min_spacing must not be negative".to_owned(),
            ));
        }
        if self.spawner.area_extents.iter().any(|e| *e < 0.0) {
            return Err(ConfigError::Invalid(
                "spawner.area_extents must not be negative".to_owned(),
            ));
        }
        if self.themes.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one theme is required".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: GameConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(parsed.seed, 7);
        assert_eq!(parsed.spawner.count, 15);
        assert_eq!(parsed.round.start_time_seconds, 60.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = GameConfig::default();
        config.round.sweep_interval = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        config.themes.themes.clear();
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.spawner.min_spacing = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = GameConfig::load(Path::new("/nonexistent/chroma.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
