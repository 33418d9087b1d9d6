//! Rotation - stances, ability availability and the fixed-priority decision policy

use crate::combat::{SpecialDamage, TableKind};
use crate::damage::DamageSource;
use crate::error::SimError;
use crate::simulation::Simulation;
use crate::timeline::EventKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Combat stance; only one is held at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    /// Primary stance: extra crit, Whirlwind and Berserker Rage
    #[default]
    Berserker,
    /// Entered only to Overpower
    Battle,
}

impl Stance {
    pub fn other(self) -> Stance {
        match self {
            Stance::Berserker => Stance::Battle,
            Stance::Battle => Stance::Berserker,
        }
    }

    /// Crit chance the stance adds
    pub fn crit_bonus(self) -> f64 {
        match self {
            Stance::Berserker => 0.03,
            Stance::Battle => 0.0,
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stance::Berserker => write!(f, "Berserker"),
            Stance::Battle => write!(f, "Battle"),
        }
    }
}

/// Abilities the policy chooses between, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    BerserkerRage,
    DeathWish,
    MortalStrike,
    Bloodthirst,
    Whirlwind,
    Overpower,
}

impl Ability {
    pub const COUNT: usize = 6;

    pub const PRIORITY: [Ability; Ability::COUNT] = [
        Ability::BerserkerRage,
        Ability::DeathWish,
        Ability::MortalStrike,
        Ability::Bloodthirst,
        Ability::Whirlwind,
        Ability::Overpower,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn cooldown_slot(self) -> EventKind {
        match self {
            Ability::BerserkerRage => EventKind::BerserkerRageCd,
            Ability::DeathWish => EventKind::DeathWishCd,
            Ability::MortalStrike => EventKind::MortalStrikeCd,
            Ability::Bloodthirst => EventKind::BloodthirstCd,
            Ability::Whirlwind => EventKind::WhirlwindCd,
            Ability::Overpower => EventKind::OverpowerCd,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ability::BerserkerRage => write!(f, "Berserker Rage"),
            Ability::DeathWish => write!(f, "Death Wish"),
            Ability::MortalStrike => write!(f, "Mortal Strike"),
            Ability::Bloodthirst => write!(f, "Bloodthirst"),
            Ability::Whirlwind => write!(f, "Whirlwind"),
            Ability::Overpower => write!(f, "Overpower"),
        }
    }
}

impl Simulation {
    /// Whether an ability could fire right now
    ///
    /// Overpower ignores stance here; the policy swaps into Battle first.
    pub fn is_available(&self, ability: Ability) -> bool {
        let talents = &self.config.character.talents;
        let abilities = &self.config.character.abilities;
        let costs = &self.config.constants.costs;
        let rage = self.rage.current();

        if self.timeline.is_active(EventKind::GlobalCd)
            || self.timeline.is_active(ability.cooldown_slot())
        {
            return false;
        }

        match ability {
            Ability::BerserkerRage => {
                talents.improved_berserker_rage > 0 && self.stance == Stance::Berserker
            }
            Ability::DeathWish => {
                talents.death_wish > 0 && self.rage.can_afford(costs.death_wish)
            }
            Ability::MortalStrike => {
                talents.mortal_strike > 0 && self.rage.can_afford(costs.mortal_strike)
            }
            Ability::Bloodthirst => {
                talents.bloodthirst > 0 && self.rage.can_afford(costs.bloodthirst)
            }
            Ability::Whirlwind => {
                let rules = &self.config.constants.rage;
                if !abilities.whirlwind || self.stance != Stance::Berserker {
                    return false;
                }
                if rage >= rules.whirlwind_dump_threshold {
                    return true;
                }
                if !self.rage.can_afford(costs.whirlwind) {
                    return false;
                }
                self.timeline.is_active(EventKind::OverpowerProcExpire)
                    && rage > self.derived.stance_swap_max_rage + rules.whirlwind_overpower_margin
            }
            Ability::Overpower => {
                abilities.overpower
                    && self.rage.can_afford(costs.overpower)
                    && self.timeline.is_active(EventKind::OverpowerProcExpire)
            }
        }
    }

    /// One decision pass: fire at most one ability, highest priority first
    pub(crate) fn try_special_attack(&mut self) -> Result<Option<Ability>, SimError> {
        if self.timeline.is_active(EventKind::GlobalCd) {
            return Ok(None);
        }

        let Some(ability) = Ability::PRIORITY
            .iter()
            .copied()
            .find(|&a| self.is_available(a))
        else {
            return Ok(None);
        };

        let fired = match ability {
            Ability::Overpower => self.try_overpower()?,
            _ => {
                self.fire(ability)?;
                true
            }
        };

        if fired {
            self.ability_uses[ability.index()] += 1;
            Ok(Some(ability))
        } else {
            Ok(None)
        }
    }

    fn fire(&mut self, ability: Ability) -> Result<(), SimError> {
        debug!(clock = self.timeline.clock(), rage = self.rage.current(), %ability, "ability");
        let cooldowns = self.config.constants.cooldowns.clone();
        let costs = self.config.constants.costs.clone();
        let formulas = self.config.constants.formulas.clone();

        match ability {
            Ability::BerserkerRage => {
                self.gain_rage(self.derived.berserker_rage_gain);
                self.timeline
                    .schedule_in(EventKind::BerserkerRageCd, cooldowns.berserker_rage)?;
                self.trigger_global_cooldown()?;
            }
            Ability::DeathWish => {
                self.rage.spend(costs.death_wish)?;
                self.timeline.schedule_in(
                    EventKind::DeathWishExpire,
                    self.config.constants.timers.death_wish_duration,
                )?;
                self.timeline
                    .schedule_in(EventKind::DeathWishCd, cooldowns.death_wish)?;
                self.trigger_global_cooldown()?;
            }
            Ability::MortalStrike => {
                self.timeline
                    .schedule_in(EventKind::MortalStrikeCd, cooldowns.mortal_strike)?;
                self.special_attack(
                    DamageSource::MortalStrike,
                    costs.mortal_strike,
                    TableKind::Special,
                    SpecialDamage::WeaponPlus(formulas.mortal_strike_bonus),
                )?;
                self.roll_sword_spec();
            }
            Ability::Bloodthirst => {
                self.timeline
                    .schedule_in(EventKind::BloodthirstCd, cooldowns.bloodthirst)?;
                self.special_attack(
                    DamageSource::Bloodthirst,
                    costs.bloodthirst,
                    TableKind::Special,
                    SpecialDamage::AttackPower(formulas.bloodthirst_attack_power),
                )?;
            }
            Ability::Whirlwind => {
                self.timeline
                    .schedule_in(EventKind::WhirlwindCd, cooldowns.whirlwind)?;
                // No sword specialization roll on Whirlwind
                self.special_attack(
                    DamageSource::Whirlwind,
                    costs.whirlwind,
                    TableKind::Special,
                    SpecialDamage::WeaponPlus(0.0),
                )?;
            }
            Ability::Overpower => {
                self.timeline
                    .schedule_in(EventKind::OverpowerCd, cooldowns.overpower)?;
                self.timeline.clear(EventKind::OverpowerProcExpire);
                self.special_attack(
                    DamageSource::Overpower,
                    costs.overpower,
                    TableKind::Overpower,
                    SpecialDamage::WeaponPlus(formulas.overpower_bonus),
                )?;
                self.roll_sword_spec();
            }
        }
        Ok(())
    }

    /// Dance into Battle stance if needed, Overpower, then try to dance back
    fn try_overpower(&mut self) -> Result<bool, SimError> {
        if self.stance == Stance::Berserker {
            self.try_swap_stance()?;
        }
        if self.stance != Stance::Battle || !self.is_available(Ability::Overpower) {
            return Ok(false);
        }
        self.fire(Ability::Overpower)?;
        self.try_swap_stance()?;
        Ok(true)
    }

    /// Toggle stance; the stance cooldown must be clear
    pub(crate) fn swap_stance(&mut self) -> Result<(), SimError> {
        self.timeline
            .arm_exclusive(EventKind::StanceCd, self.config.constants.cooldowns.stance)?;
        self.stance = self.stance.other();
        self.update_crit_chance();
        let waste = self
            .rage
            .clamp_for_stance_swap(self.derived.stance_swap_max_rage);
        debug!(
            clock = self.timeline.clock(),
            stance = %self.stance,
            wasted = waste,
            "stance swap"
        );
        self.request_evaluation();
        Ok(())
    }

    /// Swap only when the stance cooldown allows it
    pub(crate) fn try_swap_stance(&mut self) -> Result<bool, SimError> {
        if self.timeline.is_active(EventKind::StanceCd) {
            return Ok(false);
        }
        self.swap_stance()?;
        Ok(true)
    }

    pub(crate) fn trigger_global_cooldown(&mut self) -> Result<(), SimError> {
        self.timeline
            .arm_exclusive(EventKind::GlobalCd, self.config.constants.cooldowns.global)
    }
}
