//! Combat - hit tables and attack resolution

mod resolution;
pub mod table;

pub use resolution::SpecialDamage;
pub use table::{AttackTable, AttackTables, TableKind};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an attack roll, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    Miss,
    Dodge,
    Parry,
    Glance,
    Block,
    Crit,
    Hit,
}

impl HitKind {
    pub const COUNT: usize = 7;

    pub const ALL: [HitKind; HitKind::COUNT] = [
        HitKind::Miss,
        HitKind::Dodge,
        HitKind::Parry,
        HitKind::Glance,
        HitKind::Block,
        HitKind::Crit,
        HitKind::Hit,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the attack connected at all
    pub fn landed(self) -> bool {
        !matches!(self, HitKind::Miss | HitKind::Dodge | HitKind::Parry)
    }
}

impl fmt::Display for HitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitKind::Miss => write!(f, "Miss"),
            HitKind::Dodge => write!(f, "Dodge"),
            HitKind::Parry => write!(f, "Parry"),
            HitKind::Glance => write!(f, "Glance"),
            HitKind::Block => write!(f, "Block"),
            HitKind::Crit => write!(f, "Crit"),
            HitKind::Hit => write!(f, "Hit"),
        }
    }
}
