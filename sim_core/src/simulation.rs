//! Simulation - the discrete-event driver that owns all run state

use crate::combat::{AttackTables, HitKind, TableKind};
use crate::config::{ConfigError, Derived, SimConfig};
use crate::damage::{DamageLog, DamageSource};
use crate::error::SimError;
use crate::rage::Rage;
use crate::report::SimReport;
use crate::rng::RandomSource;
use crate::rotation::{Ability, Stance};
use crate::timeline::{EventKind, PeriodicTimer, Timeline};
use gear_core::Hand;
use tracing::{debug, info, trace};

/// Decision passes allowed per event before the cascade counts as runaway
pub const MAX_EVALUATION_PASSES: u32 = 64;

/// One simulated fight
///
/// Single owner of every piece of mutable state. Each step dispatches the
/// nearest pending event and then settles the ability cascade it caused
/// before returning.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) derived: Derived,
    pub(crate) rng: RandomSource,
    pub(crate) timeline: Timeline,
    pub(crate) rage: Rage,
    pub(crate) stance: Stance,
    pub(crate) flurry_charges: u32,
    pub(crate) deep_wounds: PeriodicTimer,
    pub(crate) deep_wounds_tick_damage: f64,
    pub(crate) bloodrage: PeriodicTimer,
    pub(crate) tables: AttackTables,
    pub(crate) damage: DamageLog,
    /// Set by anything that could change the policy's answer
    pub(crate) evaluation_requested: bool,
    /// Sword specialization swings waiting to resolve
    pub(crate) extra_swings: u32,
    pub(crate) ability_uses: [u64; Ability::COUNT],
    event_counts: [u64; EventKind::COUNT],
    end_time: f64,
}

impl Simulation {
    /// Validate the configuration and arm the opening events
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => RandomSource::new(seed),
            None => RandomSource::from_entropy(),
        };
        let derived = Derived::new(&config);
        let timers = &config.constants.timers;

        let mut sim = Simulation {
            rng,
            timeline: Timeline::new(),
            rage: Rage::new(config.constants.rage.max),
            stance: Stance::Berserker,
            flurry_charges: 0,
            deep_wounds: PeriodicTimer::new(
                EventKind::DeepWoundsTick,
                timers.deep_wounds_ticks,
                timers.deep_wounds_period,
            ),
            deep_wounds_tick_damage: 0.0,
            bloodrage: PeriodicTimer::new(
                EventKind::BloodrageTick,
                timers.bloodrage_ticks,
                timers.bloodrage_period,
            ),
            tables: AttackTables::default(),
            damage: DamageLog::new(),
            evaluation_requested: false,
            extra_swings: 0,
            ability_uses: [0; Ability::COUNT],
            event_counts: [0; EventKind::COUNT],
            end_time: config.duration,
            derived,
            config,
        };

        for table in TableKind::ALL {
            for (kind, chance) in sim.derived.table_chances(table) {
                sim.tables.get_mut(table).set(kind, chance);
            }
        }
        sim.update_crit_chance();
        sim.arm_opening_events()?;

        Ok(sim)
    }

    fn arm_opening_events(&mut self) -> Result<(), SimError> {
        let character = &self.config.character;
        let mut opening = vec![EventKind::MainSwing];
        if character.combat.dual_wield {
            opening.push(EventKind::OffSwing);
        }
        if character.talents.anger_management > 0 {
            opening.push(EventKind::AngerManagement);
        }
        if character.abilities.bloodrage {
            opening.push(EventKind::BloodrageCd);
        }
        for kind in opening {
            self.timeline.schedule(kind, 0.0)?;
        }
        Ok(())
    }

    /// Dispatch the next event; `None` once the run has reached its end
    pub fn step(&mut self) -> Result<Option<(EventKind, f64)>, SimError> {
        let Some((kind, at)) = self.timeline.peek() else {
            self.timeline.finish_at(self.end_time);
            return Ok(None);
        };
        if at > self.end_time {
            self.timeline.finish_at(self.end_time);
            return Ok(None);
        }

        self.timeline.advance_to(kind, at)?;
        trace!(clock = at, event = %kind, rage = self.rage.current(), "event");
        self.event_counts[kind.index()] += 1;

        self.dispatch(kind)?;
        self.request_evaluation();
        self.settle()?;
        Ok(Some((kind, at)))
    }

    /// Run to the configured duration
    pub fn run(&mut self) -> Result<(), SimError> {
        while self.step()?.is_some() {}
        info!(
            seed = self.rng.seed(),
            elapsed = self.clock(),
            total_damage = self.total_damage(),
            dps = self.dps(),
            "simulation finished"
        );
        Ok(())
    }

    fn dispatch(&mut self, kind: EventKind) -> Result<(), SimError> {
        let timers = &self.config.constants.timers;
        let rules = &self.config.constants.rage;
        match kind {
            EventKind::MainSwing | EventKind::OffSwing => {
                self.flurry_charges = self.flurry_charges.saturating_sub(1);
                let source = if kind == EventKind::MainSwing {
                    DamageSource::MainSwing
                } else {
                    DamageSource::OffSwing
                };
                self.weapon_swing(source)?;
            }
            EventKind::AngerManagement => {
                let period = timers.anger_management_period;
                let gain = rules.anger_management_per_tick;
                self.timeline.schedule_in(kind, period)?;
                self.gain_rage(gain);
            }
            EventKind::DeepWoundsTick => {
                self.deep_wounds.tick(&mut self.timeline)?;
                self.damage
                    .add(DamageSource::DeepWounds, self.deep_wounds_tick_damage);
            }
            EventKind::BloodrageTick => {
                let gain = rules.bloodrage_per_tick;
                self.bloodrage.tick(&mut self.timeline)?;
                self.gain_rage(gain);
            }
            EventKind::BloodrageCd => {
                // Off the global cooldown
                let cooldown = self.config.constants.cooldowns.bloodrage;
                let gain = rules.bloodrage_instant;
                self.timeline.schedule_in(kind, cooldown)?;
                self.gain_rage(gain);
                self.bloodrage.start(&mut self.timeline)?;
            }
            EventKind::OverpowerProcExpire => {
                self.timeline.clear(kind);
                if self.stance == Stance::Battle {
                    self.try_swap_stance()?;
                }
            }
            EventKind::StanceCd => {
                self.timeline.clear(kind);
                if self.stance == Stance::Battle
                    && !self.timeline.is_active(EventKind::OverpowerProcExpire)
                {
                    self.swap_stance()?;
                }
            }
            EventKind::DeathWishExpire
            | EventKind::MortalStrikeCd
            | EventKind::BloodthirstCd
            | EventKind::WhirlwindCd
            | EventKind::OverpowerCd
            | EventKind::BerserkerRageCd
            | EventKind::DeathWishCd
            | EventKind::GlobalCd => {
                self.timeline.clear(kind);
            }
        }
        Ok(())
    }

    /// Drain queued swings and decision passes until nothing is left to do
    fn settle(&mut self) -> Result<(), SimError> {
        let mut passes = 0;
        loop {
            while self.extra_swings > 0 {
                self.extra_swings -= 1;
                self.weapon_swing(DamageSource::SwordSpec)?;
            }
            if !self.evaluation_requested {
                return Ok(());
            }
            passes += 1;
            if passes > MAX_EVALUATION_PASSES {
                return Err(SimError::CascadeDidNotSettle {
                    clock: self.timeline.clock(),
                    passes,
                });
            }
            self.evaluation_requested = false;
            self.try_special_attack()?;
        }
    }

    pub(crate) fn request_evaluation(&mut self) {
        self.evaluation_requested = true;
    }

    /// Gain rage and ask the policy to look again
    pub(crate) fn gain_rage(&mut self, amount: u32) {
        let waste = self.rage.gain(amount);
        if waste > 0 {
            debug!(clock = self.timeline.clock(), waste, "rage overflow");
        }
        self.request_evaluation();
    }

    /// Push the current stance's crit chance into every table
    pub(crate) fn update_crit_chance(&mut self) {
        for table in TableKind::ALL {
            let chance = self.derived.table_crit_chance(table, self.stance);
            self.tables.get_mut(table).set(HitKind::Crit, chance);
        }
    }

    /// Seconds until the next swing of a hand, flurry and haste applied
    pub(crate) fn swing_time(&self, hand: Hand) -> f64 {
        let flurry = if self.flurry_charges > 0 {
            self.derived.flurry_haste
        } else {
            1.0
        };
        self.config.character.weapon(hand).swing_time / (flurry * self.derived.haste_mul)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn clock(&self) -> f64 {
        self.timeline.clock()
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn rage(&self) -> &Rage {
        &self.rage
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn flurry_charges(&self) -> u32 {
        self.flurry_charges
    }

    pub fn damage(&self) -> &DamageLog {
        &self.damage
    }

    pub fn tables(&self) -> &AttackTables {
        &self.tables
    }

    /// Times an event kind has been dispatched
    pub fn event_count(&self, kind: EventKind) -> u64 {
        self.event_counts[kind.index()]
    }

    /// Times an ability has fired
    pub fn ability_uses(&self, ability: Ability) -> u64 {
        self.ability_uses[ability.index()]
    }

    pub fn total_damage(&self) -> u64 {
        self.damage.total()
    }

    /// Damage per simulated second so far
    pub fn dps(&self) -> f64 {
        let elapsed = self.clock();
        if elapsed > 0.0 {
            self.total_damage() as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn report(&self) -> SimReport {
        SimReport::from_simulation(self)
    }
}
