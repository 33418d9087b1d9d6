//! profiles_core - Named build profiles for the rotation simulator
//!
//! Profiles are partial parameter sets loaded from TOML. A profile can extend
//! others (gear, weapon setup, talent build), and a run set adds a sweep that
//! steps one parameter through a list of offsets.

mod config;
mod profile;
mod registry;

pub use profile::{Profile, Run};
pub use registry::ProfileRegistry;

use gear_core::ParamError;
use std::path::PathBuf;
use thiserror::Error;

/// Error loading profile configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}

/// Error turning profiles into a character
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),
    #[error("Cycle detected in profile inheritance: {0}")]
    CycleDetected(String),
    #[error("Profile '{0}' has no sweep and is not a run set")]
    NotARunSet(String),
    #[error("Profile '{profile}': {source}")]
    Param {
        profile: String,
        #[source]
        source: ParamError,
    },
    #[error("Parameter override: {0}")]
    Override(#[from] ParamError),
}
