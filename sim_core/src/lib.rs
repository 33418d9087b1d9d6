//! sim_core - Discrete-event rotation simulator for melee damage per second
//!
//! This library provides:
//! - Simulation: the event-driven combat loop and all run state
//! - AttackTable: ordered cumulative hit tables
//! - Rage: the bounded resource with waste bookkeeping
//! - RotationConstants / SimConfig: explicit, validated run configuration
//! - SimReport: DPS, per-source breakdown, rage and hit statistics
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sim_core::prelude::*;
//!
//! let mut character = Character::default();
//! character.talents.mortal_strike = 1;
//!
//! let config = SimConfig::new(character).with_hours(1).with_seed(12345);
//! let mut sim = Simulation::new(config)?;
//! sim.run()?;
//! println!("{:.2} dps", sim.dps());
//! ```

pub mod combat;
pub mod config;
pub mod damage;
pub mod error;
pub mod prelude;
pub mod rage;
pub mod report;
pub mod rng;
pub mod rotation;
pub mod simulation;
pub mod timeline;

// Core API
pub use simulation::Simulation;
pub use config::{ConfigError, RotationConstants, SimConfig};
pub use error::SimError;
pub use report::SimReport;

// State and statistics
pub use combat::{AttackTable, HitKind, TableKind};
pub use damage::{DamageLog, DamageSource};
pub use rage::Rage;
pub use rotation::{Ability, Stance};
pub use timeline::EventKind;

// Re-export the configuration record
pub use gear_core::Character;
