//! Invariant violations that abort a run

use crate::combat::{HitKind, TableKind};
use crate::timeline::EventKind;
use thiserror::Error;

/// A broken timing or accounting rule
///
/// Any of these means the state machine reached a configuration it should
/// never reach, so the run stops instead of producing skewed statistics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("{kind} scheduled at {at:.4}, before the clock at {clock:.4}")]
    TimeWentBackwards { kind: EventKind, at: f64, clock: f64 },
    #[error("spending {cost} rage with only {held} held")]
    InsufficientRage { cost: u32, held: u32 },
    #[error("{table} table rolled {kind}, which it cannot produce")]
    ImpossibleHit { table: TableKind, kind: HitKind },
    #[error("{0} armed while already active")]
    TimerAlreadyArmed(EventKind),
    #[error("{0} ticked with no ticks remaining")]
    TimerExhausted(EventKind),
    #[error("ability cascade at {clock:.4} did not settle after {passes} passes")]
    CascadeDidNotSettle { clock: f64, passes: u32 },
}
