//! gear_core - Character configuration for the rotation simulator
//!
//! A [`Character`] bundles gear stats, weapons, talent ranks and the combat
//! context. It is built once (from TOML, `name=value` tokens or profiles) and
//! handed to the simulator read-only.

mod character;
pub mod types;

pub use character::{Character, PARAM_NAMES};
pub use types::{Abilities, CombatContext, GearStats, Hand, ParamValue, Talents, Weapon};

use std::path::PathBuf;
use thiserror::Error;

/// Error building a character configuration
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("Invalid argument '{0}', expected name=value")]
    InvalidToken(String),
    #[error("Invalid param name '{0}'")]
    UnknownParam(String),
    #[error("Invalid value '{value}' for param '{name}'. Expected {expected}.")]
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },
    #[error("Param '{name}' out of range: {message}")]
    OutOfRange { name: String, message: String },
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
