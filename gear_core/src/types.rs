use serde::{Deserialize, Serialize};
use std::fmt;

/// Weapon hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    MainHand,
    OffHand,
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::MainHand => write!(f, "Main hand"),
            Hand::OffHand => write!(f, "Off hand"),
        }
    }
}

/// A weapon's damage range and base swing time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weapon {
    /// Base swing time in seconds, before haste and flurry
    pub swing_time: f64,
    pub damage_min: u32,
    pub damage_max: u32,
}

impl Default for Weapon {
    fn default() -> Self {
        Weapon {
            swing_time: 3.3,
            damage_min: 100,
            damage_max: 200,
        }
    }
}

impl Weapon {
    pub fn new(swing_time: f64, damage_min: u32, damage_max: u32) -> Self {
        Weapon {
            swing_time,
            damage_min,
            damage_max,
        }
    }

    /// Midpoint of the damage range
    pub fn average_damage(&self) -> f64 {
        self.damage_min as f64 + (self.damage_max as f64 - self.damage_min as f64) / 2.0
    }
}

/// Character stats contributed by gear
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearStats {
    pub strength: u32,
    pub agility: u32,
    pub bonus_attack_power: u32,
    /// Percentage points of hit
    pub hit_bonus: u32,
    /// Percentage points of crit
    pub crit_bonus: u32,
    /// Percentage of attack speed
    pub haste_bonus: u32,
}

/// Combat situation the rotation is simulated in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatContext {
    /// Attacking from the front lets the target parry
    pub front_attack: bool,
    pub dual_wield: bool,
    pub enemy_level: u32,
    /// Damage multiplier left after the target's armour
    pub armor_mul: f64,
}

impl Default for CombatContext {
    fn default() -> Self {
        CombatContext {
            front_attack: false,
            dual_wield: false,
            enemy_level: 63,
            armor_mul: 0.80,
        }
    }
}

impl CombatContext {
    /// Levels the target has over a level 60 attacker
    pub fn level_delta(&self) -> u32 {
        self.enemy_level.saturating_sub(60)
    }
}

/// Talent ranks, 0 = untrained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Talents {
    // Arms
    pub tactical_mastery: u32,
    pub anger_management: u32,
    pub improved_overpower: u32,
    pub deep_wounds: u32,
    pub impale: u32,
    pub two_hand_spec: u32,
    pub sword_spec: u32,
    pub axe_spec: u32,
    pub mortal_strike: u32,
    // Fury
    pub cruelty: u32,
    pub unbridled_wrath: u32,
    pub improved_battle_shout: u32,
    pub dual_wield_spec: u32,
    pub death_wish: u32,
    pub flurry: u32,
    pub improved_berserker_rage: u32,
    pub bloodthirst: u32,
}

impl Talents {
    /// Every talent as (name, rank, max rank)
    pub fn ranks(&self) -> [(&'static str, u32, u32); 17] {
        [
            ("tacticalMastery", self.tactical_mastery, 5),
            ("angerManagement", self.anger_management, 1),
            ("improvedOverpower", self.improved_overpower, 2),
            ("deepWounds", self.deep_wounds, 3),
            ("impale", self.impale, 2),
            ("twoHandSpec", self.two_hand_spec, 5),
            ("swordSpec", self.sword_spec, 5),
            ("axeSpec", self.axe_spec, 5),
            ("mortalStrike", self.mortal_strike, 1),
            ("cruelty", self.cruelty, 5),
            ("unbridledWrath", self.unbridled_wrath, 5),
            ("improvedBattleShout", self.improved_battle_shout, 5),
            ("dualWieldSpec", self.dual_wield_spec, 5),
            ("deathWish", self.death_wish, 1),
            ("flurry", self.flurry, 5),
            ("improvedBerserkerRage", self.improved_berserker_rage, 2),
            ("bloodthirst", self.bloodthirst, 1),
        ]
    }

    /// Total points spent
    pub fn points_spent(&self) -> u32 {
        self.ranks().iter().map(|(_, rank, _)| rank).sum()
    }
}

/// Untalented abilities the rotation may use
///
/// All enabled by default. Switching them off isolates white damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Abilities {
    pub whirlwind: bool,
    pub overpower: bool,
    pub bloodrage: bool,
}

impl Default for Abilities {
    fn default() -> Self {
        Abilities {
            whirlwind: true,
            overpower: true,
            bloodrage: true,
        }
    }
}

impl Abilities {
    pub fn none() -> Self {
        Abilities {
            whirlwind: false,
            overpower: false,
            bloodrage: false,
        }
    }
}

/// A typed parameter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Unsigned(u32),
    Decimal(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Flag(v) => write!(f, "{}", u32::from(*v)),
            ParamValue::Unsigned(v) => write!(f, "{}", v),
            ParamValue::Decimal(v) => write!(f, "{:.2}", v),
        }
    }
}
