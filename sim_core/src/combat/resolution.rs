//! Attack resolution - rolling an attack and turning the outcome into damage and rage

use super::{HitKind, TableKind};
use crate::damage::{rage_from_damage, special_base_damage, weapon_damage, DamageSource};
use crate::error::SimError;
use crate::simulation::Simulation;
use crate::timeline::EventKind;
use gear_core::Hand;
use tracing::trace;

/// Pre-multiplier damage of an ability
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecialDamage {
    /// Main-hand weapon roll plus a flat bonus
    WeaponPlus(f64),
    /// A fraction of attack power
    AttackPower(f64),
}

impl Simulation {
    /// Resolve one white swing, from either hand or a sword specialization proc
    pub(crate) fn weapon_swing(&mut self, source: DamageSource) -> Result<(), SimError> {
        let hand = if source == DamageSource::OffSwing {
            Hand::OffHand
        } else {
            Hand::MainHand
        };

        let kind = self.tables.white.roll(&mut self.rng);
        trace!(clock = self.timeline.clock(), %source, %kind, "white swing");

        let mut mul = match kind {
            HitKind::Dodge => {
                self.open_overpower_window()?;
                0.0
            }
            HitKind::Miss | HitKind::Parry => 0.0,
            HitKind::Glance => self.derived.glance_mul,
            HitKind::Crit => {
                self.on_crit()?;
                self.derived.white_crit_mul
            }
            HitKind::Hit | HitKind::Block => self.derived.attack_mul,
        };
        if hand == Hand::OffHand {
            mul *= self.derived.off_hand_mul;
        }
        mul *= self.damage_buff();

        // Flurry from this swing's crit already applies to the next one
        let slot = match hand {
            Hand::MainHand => EventKind::MainSwing,
            Hand::OffHand => EventKind::OffSwing,
        };
        let swing_time = self.swing_time(hand);
        self.timeline.schedule_in(slot, swing_time)?;

        if kind.landed() {
            let damage = self.roll_weapon_damage(hand, false) * mul;
            self.damage.add(source, damage);
            let rage = rage_from_damage(damage, self.config.constants.rage.damage_per_rage);
            self.gain_rage(rage);
        } else {
            self.damage.add(source, 0.0);
        }

        self.roll_sword_spec();
        self.roll_unbridled_wrath();
        Ok(())
    }

    /// Spend rage, trigger the global cooldown and resolve a yellow attack
    pub(crate) fn special_attack(
        &mut self,
        source: DamageSource,
        cost: u32,
        table: TableKind,
        base: SpecialDamage,
    ) -> Result<(), SimError> {
        self.rage.spend(cost)?;
        self.trigger_global_cooldown()?;

        let kind = self.tables.get_mut(table).roll(&mut self.rng);
        trace!(clock = self.timeline.clock(), %source, %kind, "special attack");

        let mul = match kind {
            HitKind::Dodge => {
                self.open_overpower_window()?;
                None
            }
            HitKind::Miss | HitKind::Parry => None,
            HitKind::Glance => return Err(SimError::ImpossibleHit { table, kind }),
            HitKind::Crit => {
                self.on_crit()?;
                Some(self.derived.special_crit_mul)
            }
            HitKind::Hit | HitKind::Block => Some(self.derived.attack_mul),
        };

        match mul {
            Some(mul) => {
                let damage = self.special_damage(base) * mul * self.damage_buff();
                self.damage.add(source, damage);
            }
            None => self.damage.add(source, 0.0),
        }

        self.roll_unbridled_wrath();
        Ok(())
    }

    fn special_damage(&mut self, base: SpecialDamage) -> f64 {
        match base {
            SpecialDamage::WeaponPlus(bonus) => {
                special_base_damage(self.roll_weapon_damage(Hand::MainHand, false), bonus)
            }
            SpecialDamage::AttackPower(fraction) => self.derived.attack_power * fraction,
        }
    }

    /// Crits start deep wounds and refresh flurry
    fn on_crit(&mut self) -> Result<(), SimError> {
        if self.config.character.talents.deep_wounds > 0 {
            self.deep_wounds.start(&mut self.timeline)?;
            self.deep_wounds_tick_damage = self.roll_weapon_damage(Hand::MainHand, true)
                * self.derived.deep_wounds_tick_mul
                * self.damage_buff();
        }
        if self.config.character.talents.flurry > 0 {
            self.flurry_charges = self.config.constants.timers.flurry_charges;
        }
        Ok(())
    }

    /// A dodged attack opens the overpower window
    fn open_overpower_window(&mut self) -> Result<(), SimError> {
        if !self.config.character.abilities.overpower {
            return Ok(());
        }
        self.timeline.schedule_in(
            EventKind::OverpowerProcExpire,
            self.config.constants.timers.overpower_window,
        )?;
        self.request_evaluation();
        Ok(())
    }

    /// Queue an extra main-hand swing on a sword specialization proc
    pub(crate) fn roll_sword_spec(&mut self) {
        if self.rng.chance(self.derived.sword_spec_chance) {
            trace!(clock = self.timeline.clock(), "sword specialization");
            self.extra_swings += 1;
        }
    }

    fn roll_unbridled_wrath(&mut self) {
        if self.rng.chance(self.derived.unbridled_wrath_chance) {
            self.gain_rage(self.config.constants.rage.unbridled_wrath_gain);
        }
    }

    /// Weapon damage before any multiplier; `average` skips the roll
    pub(crate) fn roll_weapon_damage(&mut self, hand: Hand, average: bool) -> f64 {
        let weapon = *self.config.character.weapon(hand);
        let base = if average {
            weapon.average_damage()
        } else {
            self.rng
                .range_inclusive(weapon.damage_min, weapon.damage_max) as f64
        };
        weapon_damage(
            base,
            self.derived.attack_power,
            weapon.swing_time,
            self.config.constants.formulas.attack_power_per_dps,
        )
    }

    /// Multiplier on everything while Death Wish is up
    pub(crate) fn damage_buff(&self) -> f64 {
        if self.timeline.is_active(EventKind::DeathWishExpire) {
            self.config.constants.formulas.death_wish_multiplier
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use gear_core::Character;

    fn sim() -> Simulation {
        let config = SimConfig::new(Character::default())
            .with_duration(60.0)
            .with_seed(12345);
        let mut sim = Simulation::new(config).unwrap();
        sim.rage.gain(100);
        sim
    }

    #[test]
    fn test_special_attack_spends_and_triggers_global_cooldown() {
        let mut sim = sim();
        sim.special_attack(
            DamageSource::Whirlwind,
            25,
            TableKind::Special,
            SpecialDamage::WeaponPlus(0.0),
        )
        .unwrap();
        assert_eq!(sim.rage.current(), 75);
        assert!(sim.timeline.is_active(EventKind::GlobalCd));
        assert_eq!(sim.damage.get(DamageSource::Whirlwind).events, 1);
    }

    #[test]
    fn test_glance_on_special_table_is_fatal() {
        let mut sim = sim();
        let special = &mut sim.tables.special;
        special.set(HitKind::Miss, 0.0);
        special.set(HitKind::Dodge, 0.0);
        special.set(HitKind::Parry, 0.0);
        special.set(HitKind::Glance, 1.0);

        let result = sim.special_attack(
            DamageSource::MortalStrike,
            30,
            TableKind::Special,
            SpecialDamage::WeaponPlus(160.0),
        );
        assert_eq!(
            result,
            Err(SimError::ImpossibleHit {
                table: TableKind::Special,
                kind: HitKind::Glance,
            })
        );
        assert_eq!(sim.damage.get(DamageSource::MortalStrike).events, 0);
    }
}
