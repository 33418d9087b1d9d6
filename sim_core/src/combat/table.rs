//! Attack table - cumulative hit category thresholds over the draw range

use super::HitKind;
use crate::rng::{scale_probability, RandomSource, SPAN};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of explicit buckets; Hit takes whatever is left
const BUCKETS: usize = HitKind::COUNT - 1;

/// Which of the three tables an attack rolls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Auto attacks
    White,
    /// Yellow abilities
    Special,
    /// Overpower, which cannot be dodged and has its own crit bonus
    Overpower,
}

impl TableKind {
    pub const ALL: [TableKind; 3] = [TableKind::White, TableKind::Special, TableKind::Overpower];
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::White => write!(f, "White"),
            TableKind::Special => write!(f, "Special"),
            TableKind::Overpower => write!(f, "Overpower"),
        }
    }
}

/// Ordered partition of the draw range into hit categories
///
/// `bounds[i]` is the exclusive upper edge of category `i`. Setting one
/// category shifts every later edge by the same delta, so categories keep
/// their widths when an earlier one changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackTable {
    bounds: [u128; BUCKETS],
    counts: [u64; HitKind::COUNT],
}

impl Default for AttackTable {
    fn default() -> Self {
        AttackTable {
            bounds: [0; BUCKETS],
            counts: [0; HitKind::COUNT],
        }
    }
}

impl AttackTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probability of one category
    ///
    /// Negative chances clamp to zero. Hit has no bucket of its own and
    /// ignores this call.
    pub fn set(&mut self, kind: HitKind, chance: f64) {
        let idx = kind.index();
        if idx >= BUCKETS {
            return;
        }

        let prev = if idx == 0 { 0 } else { self.bounds[idx - 1] };
        let new_bound = prev + scale_probability(chance.max(0.0));
        let delta = new_bound as i128 - self.bounds[idx] as i128;
        self.bounds[idx] = new_bound;
        for bound in &mut self.bounds[idx + 1..] {
            *bound = (*bound as i128 + delta) as u128;
        }
    }

    /// Draw once and return the first category whose edge exceeds the draw
    pub fn roll(&mut self, rng: &mut RandomSource) -> HitKind {
        let draw = rng.next_integer() as u128;
        let idx = self
            .bounds
            .iter()
            .position(|&bound| draw < bound)
            .unwrap_or(BUCKETS);
        self.counts[idx] += 1;
        HitKind::ALL[idx]
    }

    /// Width of each category in draws, Hit included; always sums to the span
    pub fn widths(&self) -> [u128; HitKind::COUNT] {
        let mut widths = [0; HitKind::COUNT];
        let mut prev = 0;
        for (i, bound) in self.bounds.iter().enumerate() {
            let edge = (*bound).min(SPAN);
            widths[i] = edge - prev;
            prev = edge;
        }
        widths[BUCKETS] = SPAN - prev;
        widths
    }

    /// Effective probability of a category after truncation at the span
    pub fn probability(&self, kind: HitKind) -> f64 {
        self.widths()[kind.index()] as f64 / SPAN as f64
    }

    /// Number of rolls that landed on a category
    pub fn count(&self, kind: HitKind) -> u64 {
        self.counts[kind.index()]
    }

    pub fn total_rolls(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Observed frequency of every category
    pub fn frequencies(&self) -> Vec<(HitKind, f64)> {
        let total = self.total_rolls();
        HitKind::ALL
            .iter()
            .map(|&kind| {
                let freq = if total == 0 {
                    0.0
                } else {
                    self.count(kind) as f64 / total as f64
                };
                (kind, freq)
            })
            .collect()
    }
}

/// The three tables a simulation rolls on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackTables {
    pub white: AttackTable,
    pub special: AttackTable,
    pub overpower: AttackTable,
}

impl AttackTables {
    pub fn get(&self, kind: TableKind) -> &AttackTable {
        match kind {
            TableKind::White => &self.white,
            TableKind::Special => &self.special,
            TableKind::Overpower => &self.overpower,
        }
    }

    pub fn get_mut(&mut self, kind: TableKind) -> &mut AttackTable {
        match kind {
            TableKind::White => &mut self.white,
            TableKind::Special => &mut self.special,
            TableKind::Overpower => &mut self.overpower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_table_always_hits() {
        let mut table = AttackTable::new();
        let mut rng = RandomSource::new(1);
        for _ in 0..100 {
            assert_eq!(table.roll(&mut rng), HitKind::Hit);
        }
        assert_eq!(table.count(HitKind::Hit), 100);
    }

    #[test]
    fn test_probabilities() {
        let mut table = AttackTable::new();
        table.set(HitKind::Miss, 0.08);
        table.set(HitKind::Dodge, 0.065);
        table.set(HitKind::Glance, 0.4);
        table.set(HitKind::Crit, 0.2);

        assert!(close(table.probability(HitKind::Miss), 0.08));
        assert!(close(table.probability(HitKind::Dodge), 0.065));
        assert!(close(table.probability(HitKind::Parry), 0.0));
        assert!(close(table.probability(HitKind::Glance), 0.4));
        assert!(close(table.probability(HitKind::Crit), 0.2));
        assert!(close(table.probability(HitKind::Hit), 0.255));
    }

    #[test]
    fn test_reset_earlier_category_keeps_later_widths() {
        let mut table = AttackTable::new();
        table.set(HitKind::Miss, 0.1);
        table.set(HitKind::Crit, 0.3);
        table.set(HitKind::Miss, 0.05);

        assert!(close(table.probability(HitKind::Miss), 0.05));
        assert!(close(table.probability(HitKind::Crit), 0.3));
        assert!(close(table.probability(HitKind::Hit), 0.65));
    }

    #[test]
    fn test_negative_chance_clamps() {
        let mut table = AttackTable::new();
        table.set(HitKind::Miss, -0.2);
        table.set(HitKind::Crit, 0.1);
        assert_eq!(table.widths()[HitKind::Miss.index()], 0);
        assert!(close(table.probability(HitKind::Crit), 0.1));
    }

    #[test]
    fn test_overfull_table_truncates_late_categories() {
        let mut table = AttackTable::new();
        table.set(HitKind::Miss, 0.7);
        table.set(HitKind::Glance, 0.5);
        table.set(HitKind::Crit, 0.5);

        assert!(close(table.probability(HitKind::Miss), 0.7));
        assert!(close(table.probability(HitKind::Glance), 0.3));
        assert_eq!(table.widths()[HitKind::Crit.index()], 0);
        assert_eq!(table.widths()[HitKind::Hit.index()], 0);
    }

    #[test]
    fn test_roll_frequencies() {
        let mut table = AttackTable::new();
        table.set(HitKind::Miss, 0.2);
        table.set(HitKind::Crit, 0.3);

        let mut rng = RandomSource::new(99);
        for _ in 0..20000 {
            table.roll(&mut rng);
        }
        let freqs = table.frequencies();
        let miss = freqs[HitKind::Miss.index()].1;
        let crit = freqs[HitKind::Crit.index()].1;
        assert!(miss > 0.18 && miss < 0.22, "Miss rate was {}", miss);
        assert!(crit > 0.28 && crit < 0.32, "Crit rate was {}", crit);
        assert_eq!(table.total_rolls(), 20000);
    }

    fn settable_kind() -> impl Strategy<Value = HitKind> {
        (0..BUCKETS).prop_map(|i| HitKind::ALL[i])
    }

    proptest! {
        #[test]
        fn widths_always_cover_the_span(
            ops in prop::collection::vec((settable_kind(), -0.5f64..1.5), 0..40)
        ) {
            let mut table = AttackTable::new();
            for (kind, chance) in ops {
                table.set(kind, chance);
            }
            let total: u128 = table.widths().iter().sum();
            prop_assert_eq!(total, SPAN);
        }

        #[test]
        fn widths_track_last_setting_when_not_overfull(
            ops in prop::collection::vec((settable_kind(), 0.0f64..0.16), 0..40)
        ) {
            let mut table = AttackTable::new();
            let mut latest = [0.0f64; BUCKETS];
            for (kind, chance) in ops {
                table.set(kind, chance);
                latest[kind.index()] = chance;
            }
            let widths = table.widths();
            for (i, chance) in latest.iter().enumerate() {
                prop_assert_eq!(widths[i], scale_probability(*chance));
            }
        }
    }
}
