//! Event timeline - one pending-time slot per event kind

mod periodic;

pub use periodic::PeriodicTimer;

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for a slot with nothing scheduled
pub const INACTIVE: f64 = f64::INFINITY;

/// Every kind of event the simulation schedules
///
/// Declaration order breaks ties between events due at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MainSwing,
    OffSwing,
    AngerManagement,
    DeepWoundsTick,
    BloodrageTick,
    OverpowerProcExpire,
    DeathWishExpire,
    MortalStrikeCd,
    BloodthirstCd,
    WhirlwindCd,
    OverpowerCd,
    BloodrageCd,
    BerserkerRageCd,
    DeathWishCd,
    StanceCd,
    GlobalCd,
}

impl EventKind {
    pub const COUNT: usize = 16;

    pub const ALL: [EventKind; EventKind::COUNT] = [
        EventKind::MainSwing,
        EventKind::OffSwing,
        EventKind::AngerManagement,
        EventKind::DeepWoundsTick,
        EventKind::BloodrageTick,
        EventKind::OverpowerProcExpire,
        EventKind::DeathWishExpire,
        EventKind::MortalStrikeCd,
        EventKind::BloodthirstCd,
        EventKind::WhirlwindCd,
        EventKind::OverpowerCd,
        EventKind::BloodrageCd,
        EventKind::BerserkerRageCd,
        EventKind::DeathWishCd,
        EventKind::StanceCd,
        EventKind::GlobalCd,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::MainSwing => "MainSwing",
            EventKind::OffSwing => "OffSwing",
            EventKind::AngerManagement => "AngerManagement",
            EventKind::DeepWoundsTick => "DeepWoundsTick",
            EventKind::BloodrageTick => "BloodrageTick",
            EventKind::OverpowerProcExpire => "OverpowerProcExpire",
            EventKind::DeathWishExpire => "DeathWishExpire",
            EventKind::MortalStrikeCd => "MortalStrikeCD",
            EventKind::BloodthirstCd => "BloodthirstCD",
            EventKind::WhirlwindCd => "WhirlwindCD",
            EventKind::OverpowerCd => "OverpowerCD",
            EventKind::BloodrageCd => "BloodrageCD",
            EventKind::BerserkerRageCd => "BerserkerRageCD",
            EventKind::DeathWishCd => "DeathWishCD",
            EventKind::StanceCd => "StanceCD",
            EventKind::GlobalCd => "GlobalCD",
        };
        write!(f, "{}", name)
    }
}

/// Simulation clock plus a fixed array of pending event times
///
/// Invariant: an active slot is never earlier than the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    slots: [f64; EventKind::COUNT],
    clock: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Timeline {
            slots: [INACTIVE; EventKind::COUNT],
            clock: 0.0,
        }
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn is_active(&self, kind: EventKind) -> bool {
        self.slots[kind.index()] != INACTIVE
    }

    /// Scheduled time of a slot, if armed
    pub fn time_of(&self, kind: EventKind) -> Option<f64> {
        let at = self.slots[kind.index()];
        (at != INACTIVE).then_some(at)
    }

    /// Arm (or re-arm) a slot at an absolute time
    pub fn schedule(&mut self, kind: EventKind, at: f64) -> Result<(), SimError> {
        if at < self.clock || at.is_nan() {
            return Err(SimError::TimeWentBackwards {
                kind,
                at,
                clock: self.clock,
            });
        }
        self.slots[kind.index()] = at;
        Ok(())
    }

    /// Arm a slot `delay` seconds from now
    pub fn schedule_in(&mut self, kind: EventKind, delay: f64) -> Result<(), SimError> {
        self.schedule(kind, self.clock + delay)
    }

    /// Arm a slot that must not already be running
    pub fn arm_exclusive(&mut self, kind: EventKind, delay: f64) -> Result<(), SimError> {
        if self.is_active(kind) {
            return Err(SimError::TimerAlreadyArmed(kind));
        }
        self.schedule_in(kind, delay)
    }

    pub fn clear(&mut self, kind: EventKind) {
        self.slots[kind.index()] = INACTIVE;
    }

    /// Nearest pending event; ties go to the earlier declared kind
    pub fn peek(&self) -> Option<(EventKind, f64)> {
        let mut low_index = 0;
        let mut low_time = self.slots[0];
        for (i, &at) in self.slots.iter().enumerate().skip(1) {
            if at < low_time {
                low_time = at;
                low_index = i;
            }
        }
        (low_time != INACTIVE).then(|| (EventKind::ALL[low_index], low_time))
    }

    /// Move the clock forward; moving it back is an invariant violation
    pub fn advance_to(&mut self, kind: EventKind, at: f64) -> Result<(), SimError> {
        if at < self.clock || at.is_nan() {
            return Err(SimError::TimeWentBackwards {
                kind,
                at,
                clock: self.clock,
            });
        }
        self.clock = at;
        Ok(())
    }

    /// Move the clock to the end of the run without dispatching anything
    pub(crate) fn finish_at(&mut self, end: f64) {
        if end > self.clock {
            self.clock = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_timeline() {
        let timeline = Timeline::new();
        assert_eq!(timeline.peek(), None);
        assert!(!timeline.is_active(EventKind::MainSwing));
        assert_eq!(timeline.time_of(EventKind::MainSwing), None);
    }

    #[test]
    fn test_peek_picks_earliest() {
        let mut timeline = Timeline::new();
        timeline.schedule(EventKind::GlobalCd, 1.5).unwrap();
        timeline.schedule(EventKind::MainSwing, 3.3).unwrap();
        timeline.schedule(EventKind::BloodrageTick, 1.0).unwrap();
        assert_eq!(timeline.peek(), Some((EventKind::BloodrageTick, 1.0)));
    }

    #[test]
    fn test_ties_follow_declaration_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(EventKind::GlobalCd, 2.0).unwrap();
        timeline.schedule(EventKind::OffSwing, 2.0).unwrap();
        timeline.schedule(EventKind::WhirlwindCd, 2.0).unwrap();
        assert_eq!(timeline.peek(), Some((EventKind::OffSwing, 2.0)));
    }

    #[test]
    fn test_schedule_in_past_is_fatal() {
        let mut timeline = Timeline::new();
        timeline.advance_to(EventKind::MainSwing, 5.0).unwrap();
        let err = timeline.schedule(EventKind::MainSwing, 4.0).unwrap_err();
        assert!(matches!(err, SimError::TimeWentBackwards { .. }));
        assert!(timeline.advance_to(EventKind::MainSwing, 4.9).is_err());
    }

    #[test]
    fn test_arm_exclusive() {
        let mut timeline = Timeline::new();
        timeline.arm_exclusive(EventKind::GlobalCd, 1.5).unwrap();
        assert_eq!(
            timeline.arm_exclusive(EventKind::GlobalCd, 1.5),
            Err(SimError::TimerAlreadyArmed(EventKind::GlobalCd))
        );
        timeline.clear(EventKind::GlobalCd);
        assert!(timeline.arm_exclusive(EventKind::GlobalCd, 1.5).is_ok());
    }

    #[test]
    fn test_schedule_in_is_relative_to_clock() {
        let mut timeline = Timeline::new();
        timeline.advance_to(EventKind::MainSwing, 10.0).unwrap();
        timeline.schedule_in(EventKind::WhirlwindCd, 10.0).unwrap();
        assert_eq!(timeline.time_of(EventKind::WhirlwindCd), Some(20.0));
    }

    #[test]
    fn test_names_follow_declaration() {
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(EventKind::GlobalCd.to_string(), "GlobalCD");
    }
}
