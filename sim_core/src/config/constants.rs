//! Rotation constants: rage costs, cooldowns, timer lengths and coefficients

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ConfigError;

/// Tunable rotation constants
///
/// Defaults reproduce the reference rotation. A TOML file only needs the
/// fields it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationConstants {
    #[serde(default)]
    pub costs: RageCosts,
    #[serde(default)]
    pub cooldowns: Cooldowns,
    #[serde(default)]
    pub timers: Timers,
    #[serde(default)]
    pub rage: RageRules,
    #[serde(default)]
    pub formulas: Formulas,
}

impl RotationConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        super::load_toml(path)
    }

    /// Parse constants from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        super::parse_toml(content)
    }
}

/// Rage cost of each ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RageCosts {
    #[serde(default = "default_strike_cost")]
    pub mortal_strike: u32,
    #[serde(default = "default_strike_cost")]
    pub bloodthirst: u32,
    #[serde(default = "default_death_wish_cost")]
    pub death_wish: u32,
    #[serde(default = "default_whirlwind_cost")]
    pub whirlwind: u32,
    #[serde(default = "default_overpower_cost")]
    pub overpower: u32,
}

impl Default for RageCosts {
    fn default() -> Self {
        RageCosts {
            mortal_strike: 30,
            bloodthirst: 30,
            death_wish: 10,
            whirlwind: 25,
            overpower: 5,
        }
    }
}

fn default_strike_cost() -> u32 {
    30
}
fn default_death_wish_cost() -> u32 {
    10
}
fn default_whirlwind_cost() -> u32 {
    25
}
fn default_overpower_cost() -> u32 {
    5
}

/// Ability cooldowns in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cooldowns {
    pub mortal_strike: f64,
    pub bloodthirst: f64,
    pub whirlwind: f64,
    pub overpower: f64,
    pub berserker_rage: f64,
    pub death_wish: f64,
    pub bloodrage: f64,
    /// Shared lockout after any ability
    pub global: f64,
    pub stance: f64,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Cooldowns {
            mortal_strike: 6.0,
            bloodthirst: 6.0,
            whirlwind: 10.0,
            overpower: 5.0,
            berserker_rage: 30.0,
            death_wish: 180.0,
            bloodrage: 60.0,
            global: 1.5,
            stance: 1.5,
        }
    }
}

/// Buff windows and periodic effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timers {
    /// How long a dodge keeps Overpower usable
    pub overpower_window: f64,
    pub death_wish_duration: f64,
    pub anger_management_period: f64,
    pub deep_wounds_ticks: u32,
    pub deep_wounds_period: f64,
    pub bloodrage_ticks: u32,
    pub bloodrage_period: f64,
    pub flurry_charges: u32,
}

impl Default for Timers {
    fn default() -> Self {
        Timers {
            overpower_window: 5.0,
            death_wish_duration: 30.0,
            anger_management_period: 3.0,
            deep_wounds_ticks: 4,
            deep_wounds_period: 3.0,
            bloodrage_ticks: 10,
            bloodrage_period: 1.0,
            flurry_charges: 3,
        }
    }
}

/// Rage generation and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RageRules {
    pub max: u32,
    /// White damage per point of rage
    pub damage_per_rage: f64,
    pub bloodrage_instant: u32,
    pub bloodrage_per_tick: u32,
    pub anger_management_per_tick: u32,
    pub unbridled_wrath_gain: u32,
    /// Per rank of improved berserker rage
    pub berserker_rage_per_rank: u32,
    /// Whirlwind dumps rage at or above this
    pub whirlwind_dump_threshold: u32,
    /// Whirlwind during an overpower window needs this much above the stance cap
    pub whirlwind_overpower_margin: u32,
}

impl Default for RageRules {
    fn default() -> Self {
        RageRules {
            max: 100,
            damage_per_rage: 30.7,
            bloodrage_instant: 10,
            bloodrage_per_tick: 1,
            anger_management_per_tick: 1,
            unbridled_wrath_gain: 1,
            berserker_rage_per_rank: 5,
            whirlwind_dump_threshold: 70,
            whirlwind_overpower_margin: 10,
        }
    }
}

/// Damage formula coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formulas {
    pub battle_shout_attack_power: f64,
    pub mortal_strike_bonus: f64,
    pub overpower_bonus: f64,
    /// Fraction of attack power Bloodthirst deals
    pub bloodthirst_attack_power: f64,
    pub death_wish_multiplier: f64,
    /// Attack power per point of weapon DPS
    pub attack_power_per_dps: f64,
}

impl Default for Formulas {
    fn default() -> Self {
        Formulas {
            battle_shout_attack_power: 193.0,
            mortal_strike_bonus: 160.0,
            overpower_bonus: 35.0,
            bloodthirst_attack_power: 0.45,
            death_wish_multiplier: 1.2,
            attack_power_per_dps: 14.0,
        }
    }
}
