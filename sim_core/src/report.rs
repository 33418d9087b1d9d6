//! Run report - the pull-based summary of a finished (or paused) simulation

use crate::combat::{HitKind, TableKind};
use crate::damage::DamageSource;
use crate::rotation::Ability;
use crate::simulation::Simulation;
use serde::Serialize;
use std::fmt::Write;

/// Damage dealt by one source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: DamageSource,
    pub events: u64,
    pub damage: u64,
    /// Fraction of total damage
    pub share: f64,
}

/// Rage accounting over the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RageReport {
    pub generated: u64,
    pub spent: u64,
    pub wasted_overflow: u64,
    pub wasted_stance_swap: u64,
    pub current: u32,
}

/// Observed outcomes of one attack table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    pub table: TableKind,
    pub rolls: u64,
    pub frequencies: Vec<(HitKind, f64)>,
}

/// Everything a run reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub seed: u64,
    /// Simulated seconds
    pub elapsed: f64,
    pub total_damage: u64,
    pub dps: f64,
    pub sources: Vec<SourceReport>,
    pub abilities: Vec<(Ability, u64)>,
    pub rage: RageReport,
    pub tables: Vec<TableReport>,
}

impl SimReport {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let total = sim.total_damage();
        let sources = sim
            .damage()
            .iter()
            .map(|(source, totals)| SourceReport {
                source,
                events: totals.events,
                damage: totals.damage,
                share: if total == 0 {
                    0.0
                } else {
                    totals.damage as f64 / total as f64
                },
            })
            .collect();

        let rage = sim.rage();
        let tables = TableKind::ALL
            .iter()
            .map(|&kind| {
                let table = sim.tables().get(kind);
                TableReport {
                    table: kind,
                    rolls: table.total_rolls(),
                    frequencies: table.frequencies(),
                }
            })
            .collect();

        SimReport {
            seed: sim.seed(),
            elapsed: sim.clock(),
            total_damage: total,
            dps: sim.dps(),
            sources,
            abilities: Ability::PRIORITY
                .iter()
                .map(|&a| (a, sim.ability_uses(a)))
                .collect(),
            rage: RageReport {
                generated: rage.generated(),
                spent: rage.spent(),
                wasted_overflow: rage.wasted_overflow(),
                wasted_stance_swap: rage.wasted_stance_swap(),
                current: rage.current(),
            },
            tables,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Multi-line human readable summary
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Seed:         {}", self.seed);
        let _ = writeln!(out, "Elapsed:      {:.1}s", self.elapsed);
        let _ = writeln!(out, "Total damage: {}", self.total_damage);
        let _ = writeln!(out, "DPS:          {:.2}", self.dps);

        let _ = writeln!(out, "\nDamage by source:");
        for s in self.sources.iter().filter(|s| s.events > 0) {
            let _ = writeln!(
                out,
                "  {:<14} {:>9} events {:>12} damage {:>6.2}%",
                s.source.to_string(),
                s.events,
                s.damage,
                s.share * 100.0
            );
        }

        let _ = writeln!(out, "\nAbilities:");
        for (ability, uses) in self.abilities.iter().filter(|(_, n)| *n > 0) {
            let _ = writeln!(out, "  {:<14} {:>9}", ability.to_string(), uses);
        }

        let _ = writeln!(out, "\nRage:");
        let _ = writeln!(out, "  generated            {}", self.rage.generated);
        let _ = writeln!(out, "  spent                {}", self.rage.spent);
        let _ = writeln!(out, "  wasted at cap        {}", self.rage.wasted_overflow);
        let _ = writeln!(out, "  wasted on stance     {}", self.rage.wasted_stance_swap);

        for table in self.tables.iter().filter(|t| t.rolls > 0) {
            let _ = writeln!(out, "\n{} table ({} rolls):", table.table, table.rolls);
            for (kind, freq) in &table.frequencies {
                if *freq > 0.0 {
                    let _ = writeln!(out, "  {:<8} {:>6.2}%", kind.to_string(), freq * 100.0);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use gear_core::Character;

    fn finished() -> SimReport {
        let config = SimConfig::new(Character::default())
            .with_duration(600.0)
            .with_seed(7);
        let mut sim = Simulation::new(config).unwrap();
        sim.run().unwrap();
        sim.report()
    }

    #[test]
    fn test_report_totals_agree() {
        let report = finished();
        let summed: u64 = report.sources.iter().map(|s| s.damage).sum();
        assert_eq!(summed, report.total_damage);
        assert!((report.dps - report.total_damage as f64 / 600.0).abs() < 1e-9);
        let shares: f64 = report.sources.iter().map(|s| s.share).sum();
        assert!((shares - 1.0).abs() < 1e-9);
        assert_eq!(report.seed, 7);
        assert_eq!(report.sources.len(), DamageSource::COUNT);
    }

    #[test]
    fn test_white_table_counts_every_swing() {
        let report = finished();
        let white = &report.tables[0];
        assert_eq!(white.table, TableKind::White);
        let swings: u64 = report
            .sources
            .iter()
            .filter(|s| s.source.is_white())
            .map(|s| s.events)
            .sum();
        assert_eq!(white.rolls, swings);
    }

    #[test]
    fn test_text_and_json() {
        let report = finished();
        let text = report.to_text();
        assert!(text.contains("DPS:"));
        assert!(text.contains("MainSwing"));
        assert!(text.contains("White table"));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"total_damage\""));
        assert!(json.contains("\"main_swing\""));
    }
}
