//! Simulation configuration: the character, rotation constants and run parameters

mod constants;
mod derived;

pub use constants::{Cooldowns, Formulas, RageCosts, RageRules, RotationConstants, Timers};
pub use derived::Derived;

use crate::error::SimError;
use gear_core::{Character, ParamError};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default run length: 100 hours of simulated combat
pub const DEFAULT_DURATION: f64 = 100.0 * 60.0 * 60.0;

/// Error loading or validating simulation configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Parse error in '{path:?}': {error}")]
    Parse {
        error: toml::de::Error,
        path: Option<PathBuf>,
    },
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Arming opening events: {0}")]
    Opening(#[from] SimError),
}

/// Load and deserialize a TOML file
pub(crate) fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        error: e,
        path: path.to_path_buf(),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        error: e,
        path: Some(path.to_path_buf()),
    })
}

/// Deserialize a TOML string
pub(crate) fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        error: e,
        path: None,
    })
}

/// Everything a simulation run reads, fixed for the run's lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub character: Character,
    pub constants: RotationConstants,
    /// Simulated seconds
    pub duration: f64,
    /// None draws a fresh seed
    pub seed: Option<u64>,
}

impl SimConfig {
    pub fn new(character: Character) -> Self {
        SimConfig {
            character,
            constants: RotationConstants::default(),
            duration: DEFAULT_DURATION,
            seed: None,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_hours(self, hours: u32) -> Self {
        self.with_duration(hours as f64 * 60.0 * 60.0)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_constants(mut self, constants: RotationConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Reject anything the engine cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.character.validate()?;

        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::Validation(format!(
                "duration must be a positive number of seconds, got {}",
                self.duration
            )));
        }

        let c = &self.constants;
        let periods = [
            ("timers.anger_management_period", c.timers.anger_management_period),
            ("timers.deep_wounds_period", c.timers.deep_wounds_period),
            ("timers.bloodrage_period", c.timers.bloodrage_period),
            ("cooldowns.bloodrage", c.cooldowns.bloodrage),
            ("rage.damage_per_rage", c.rage.damage_per_rage),
            ("formulas.attack_power_per_dps", c.formulas.attack_power_per_dps),
        ];
        for (name, value) in periods {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let durations = [
            ("cooldowns.mortal_strike", c.cooldowns.mortal_strike),
            ("cooldowns.bloodthirst", c.cooldowns.bloodthirst),
            ("cooldowns.whirlwind", c.cooldowns.whirlwind),
            ("cooldowns.overpower", c.cooldowns.overpower),
            ("cooldowns.berserker_rage", c.cooldowns.berserker_rage),
            ("cooldowns.death_wish", c.cooldowns.death_wish),
            ("cooldowns.global", c.cooldowns.global),
            ("cooldowns.stance", c.cooldowns.stance),
            ("timers.overpower_window", c.timers.overpower_window),
            ("timers.death_wish_duration", c.timers.death_wish_duration),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if c.rage.max == 0 {
            return Err(ConfigError::Validation(
                "rage.max must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::new(Character::default());
        assert!(config.validate().is_ok());
        assert!((config.duration - 360_000.0).abs() < f64::EPSILON);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builder() {
        let config = SimConfig::new(Character::default())
            .with_hours(1)
            .with_seed(42);
        assert!((config.duration - 3600.0).abs() < f64::EPSILON);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_rejects_bad_duration() {
        let config = SimConfig::new(Character::default()).with_duration(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = SimConfig::new(Character::default()).with_duration(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_period() {
        let mut constants = RotationConstants::default();
        constants.timers.bloodrage_period = 0.0;
        let config = SimConfig::new(Character::default()).with_constants(constants);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_character_errors_pass_through() {
        let mut character = Character::default();
        character.talents.flurry = 9;
        let config = SimConfig::new(character);
        assert!(matches!(config.validate(), Err(ConfigError::Param(_))));
    }
}
