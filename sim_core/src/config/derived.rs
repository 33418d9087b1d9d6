//! Constants derived once from the character before a run starts

use super::SimConfig;
use crate::combat::{HitKind, TableKind};
use crate::rotation::Stance;

/// Multipliers and chances that never change during a run
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub level_delta: u32,

    // Damage multipliers per hit category
    pub attack_mul: f64,
    pub glance_mul: f64,
    pub white_crit_mul: f64,
    pub special_crit_mul: f64,
    pub off_hand_mul: f64,

    // Swing speed
    pub haste_mul: f64,
    /// Swing speed multiplier while flurry has charges
    pub flurry_haste: f64,

    // Proc chances
    pub sword_spec_chance: f64,
    pub unbridled_wrath_chance: f64,

    // Table chances
    pub white_miss_chance: f64,
    pub special_miss_chance: f64,
    pub dodge_chance: f64,
    pub parry_chance: f64,
    pub glance_chance: f64,
    /// Crit chance from everything except stance
    pub base_crit_chance: f64,
    pub overpower_crit_bonus: f64,

    pub attack_power: f64,
    pub deep_wounds_tick_mul: f64,
    /// Most rage kept through a stance swap
    pub stance_swap_max_rage: u32,
    pub berserker_rage_gain: u32,
}

impl Derived {
    pub fn new(config: &SimConfig) -> Self {
        let c = &config.character;
        let t = &c.talents;
        let s = &c.stats;
        let formulas = &config.constants.formulas;

        let level_delta = c.combat.level_delta();
        let attack_mul = c.combat.armor_mul * (1.0 + 0.01 * t.two_hand_spec as f64);
        let glance_penalty = match level_delta {
            0 | 1 => 0.95,
            2 => 0.85,
            _ => 0.65,
        };

        let special_miss_chance = 0.05
            + level_delta as f64 * 0.01
            + if level_delta > 2 { 0.01 } else { 0.0 }
            - s.hit_bonus as f64 * 0.01;
        let white_miss_chance =
            special_miss_chance + if c.combat.dual_wield { 0.19 } else { 0.0 };
        let dodge_chance = 0.05 + level_delta as f64 * 0.005;
        let parry_chance = if c.combat.front_attack {
            0.05 + level_delta as f64 * 0.005
        } else {
            0.0
        };

        let fixed_crit_bonus = 0.01 * (t.cruelty + t.axe_spec) as f64
            - 0.01 * level_delta as f64
            - if level_delta > 2 { 0.018 } else { 0.0 };
        let base_crit_chance = 0.05
            + (0.01 / 20.0) * s.agility as f64
            + fixed_crit_bonus
            + s.crit_bonus as f64 * 0.01;

        let battle_shout = formulas.battle_shout_attack_power
            * (1.0 + 0.05 * t.improved_battle_shout as f64);
        let attack_power =
            s.strength as f64 * 2.0 + battle_shout + s.bonus_attack_power as f64;

        let flurry_haste = if t.flurry == 0 {
            1.0
        } else {
            1.0 + 0.1 + 0.05 * (t.flurry - 1) as f64
        };

        Derived {
            level_delta,
            attack_mul,
            glance_mul: glance_penalty * attack_mul,
            white_crit_mul: 2.0 * attack_mul,
            special_crit_mul: (2.0 + 0.1 * t.impale as f64) * attack_mul,
            off_hand_mul: 0.5 * (1.0 + 0.05 * t.dual_wield_spec as f64),
            haste_mul: 1.0 + 0.01 * s.haste_bonus as f64,
            flurry_haste,
            sword_spec_chance: 0.01 * t.sword_spec as f64,
            unbridled_wrath_chance: 0.08 * t.unbridled_wrath as f64,
            white_miss_chance,
            special_miss_chance,
            dodge_chance,
            parry_chance,
            glance_chance: 0.1 + 0.1 * level_delta as f64,
            base_crit_chance,
            overpower_crit_bonus: 0.25 * t.improved_overpower as f64,
            attack_power,
            deep_wounds_tick_mul: (0.2 * t.deep_wounds as f64) / 4.0,
            stance_swap_max_rage: 5 * t.tactical_mastery,
            berserker_rage_gain: config.constants.rage.berserker_rage_per_rank
                * t.improved_berserker_rage,
        }
    }

    /// Crit chance in a stance
    pub fn crit_chance(&self, stance: Stance) -> f64 {
        self.base_crit_chance + stance.crit_bonus()
    }

    /// Crit chance for a table in a stance
    pub fn table_crit_chance(&self, table: TableKind, stance: Stance) -> f64 {
        match table {
            TableKind::Overpower => self.crit_chance(stance) + self.overpower_crit_bonus,
            TableKind::White | TableKind::Special => self.crit_chance(stance),
        }
    }

    /// Non-crit chances for a table, in table order
    pub fn table_chances(&self, table: TableKind) -> Vec<(HitKind, f64)> {
        match table {
            TableKind::White => vec![
                (HitKind::Miss, self.white_miss_chance),
                (HitKind::Dodge, self.dodge_chance),
                (HitKind::Parry, self.parry_chance),
                (HitKind::Glance, self.glance_chance),
            ],
            TableKind::Special => vec![
                (HitKind::Miss, self.special_miss_chance),
                (HitKind::Dodge, self.dodge_chance),
                (HitKind::Parry, self.parry_chance),
            ],
            TableKind::Overpower => vec![
                (HitKind::Miss, self.special_miss_chance),
                (HitKind::Parry, self.parry_chance),
            ],
        }
    }
}
