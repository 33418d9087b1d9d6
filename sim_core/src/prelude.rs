//! Prelude module for convenient imports
//!
//! ```rust
//! use sim_core::prelude::*;
//! ```

// Engine
pub use crate::simulation::Simulation;
pub use crate::report::SimReport;

// Configuration
pub use crate::config::{ConfigError, RotationConstants, SimConfig, DEFAULT_DURATION};

// Combat
pub use crate::combat::{HitKind, TableKind};
pub use crate::damage::DamageSource;
pub use crate::rotation::{Ability, Stance};
pub use crate::timeline::EventKind;

// Errors
pub use crate::error::SimError;

// Re-exports from gear_core
pub use gear_core::{Abilities, Character, Hand, Talents, Weapon};
