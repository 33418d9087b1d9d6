//! Damage - per-source accounting and the formulas that produce it

mod calculation;

pub use calculation::{rage_from_damage, special_base_damage, weapon_damage};

use serde::{Deserialize, Serialize};
use std::fmt;

/// What dealt a piece of damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSource {
    MainSwing,
    OffSwing,
    /// Extra main-hand swing from sword specialization
    SwordSpec,
    Bloodthirst,
    MortalStrike,
    DeepWounds,
    Whirlwind,
    Overpower,
}

impl DamageSource {
    pub const COUNT: usize = 8;

    pub const ALL: [DamageSource; DamageSource::COUNT] = [
        DamageSource::MainSwing,
        DamageSource::OffSwing,
        DamageSource::SwordSpec,
        DamageSource::Bloodthirst,
        DamageSource::MortalStrike,
        DamageSource::DeepWounds,
        DamageSource::Whirlwind,
        DamageSource::Overpower,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Auto attacks, as opposed to abilities and ticks
    pub fn is_white(self) -> bool {
        matches!(
            self,
            DamageSource::MainSwing | DamageSource::OffSwing | DamageSource::SwordSpec
        )
    }
}

impl fmt::Display for DamageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageSource::MainSwing => write!(f, "MainSwing"),
            DamageSource::OffSwing => write!(f, "OffSwing"),
            DamageSource::SwordSpec => write!(f, "SwordSpec"),
            DamageSource::Bloodthirst => write!(f, "Bloodthirst"),
            DamageSource::MortalStrike => write!(f, "MortalStrike"),
            DamageSource::DeepWounds => write!(f, "DeepWounds"),
            DamageSource::Whirlwind => write!(f, "Whirlwind"),
            DamageSource::Overpower => write!(f, "Overpower"),
        }
    }
}

/// Accumulated events and damage for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTotal {
    pub damage: u64,
    /// Attempts, including ones that dealt nothing
    pub events: u64,
}

/// Monotonic per-source damage accumulator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageLog {
    totals: [SourceTotal; DamageSource::COUNT],
}

impl DamageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event; fractional damage is truncated per event
    pub fn add(&mut self, source: DamageSource, damage: f64) {
        let entry = &mut self.totals[source.index()];
        entry.events += 1;
        entry.damage += damage.max(0.0) as u64;
    }

    pub fn get(&self, source: DamageSource) -> SourceTotal {
        self.totals[source.index()]
    }

    pub fn total(&self) -> u64 {
        self.totals.iter().map(|t| t.damage).sum()
    }

    pub fn total_events(&self) -> u64 {
        self.totals.iter().map(|t| t.events).sum()
    }

    /// Every source with its totals, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (DamageSource, SourceTotal)> + '_ {
        DamageSource::ALL
            .iter()
            .map(move |&source| (source, self.get(source)))
    }
}
