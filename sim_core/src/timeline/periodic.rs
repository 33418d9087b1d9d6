use super::{EventKind, Timeline};
use crate::error::SimError;

/// A timer that fires a fixed number of ticks at a fixed period
///
/// Used for deep wounds (4 ticks every 3s) and bloodrage (10 ticks every 1s).
/// Starting it again while running restarts the count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTimer {
    kind: EventKind,
    num_ticks: u32,
    period: f64,
    remaining: u32,
}

impl PeriodicTimer {
    pub fn new(kind: EventKind, num_ticks: u32, period: f64) -> Self {
        PeriodicTimer {
            kind,
            num_ticks,
            period,
            remaining: 0,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }

    /// Arm the first tick one period from now
    pub fn start(&mut self, timeline: &mut Timeline) -> Result<(), SimError> {
        if self.num_ticks == 0 {
            return Ok(());
        }
        self.remaining = self.num_ticks;
        timeline.schedule_in(self.kind, self.period)
    }

    /// Consume one tick, rescheduling or clearing the slot
    pub fn tick(&mut self, timeline: &mut Timeline) -> Result<(), SimError> {
        if self.remaining == 0 {
            return Err(SimError::TimerExhausted(self.kind));
        }
        self.remaining -= 1;
        if self.remaining > 0 {
            timeline.schedule_in(self.kind, self.period)
        } else {
            timeline.clear(self.kind);
            Ok(())
        }
    }
}
