//! Rage - the bounded resource special abilities spend

use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Rage pool in `0..=max` with waste bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rage {
    current: u32,
    max: u32,
    /// Everything offered to `gain`, kept or not
    generated: u64,
    /// Lost to the cap
    wasted_overflow: u64,
    /// Lost to stance swaps
    wasted_stance_swap: u64,
    spent: u64,
}

impl Default for Rage {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Rage {
    pub fn new(max: u32) -> Self {
        Rage {
            current: 0,
            max,
            generated: 0,
            wasted_overflow: 0,
            wasted_stance_swap: 0,
            spent: 0,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn generated(&self) -> u64 {
        self.generated
    }

    pub fn wasted_overflow(&self) -> u64 {
        self.wasted_overflow
    }

    pub fn wasted_stance_swap(&self) -> u64 {
        self.wasted_stance_swap
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Add rage, clamping at the cap; returns the amount wasted
    pub fn gain(&mut self, amount: u32) -> u32 {
        self.generated += amount as u64;
        let total = self.current.saturating_add(amount);
        let waste = total.saturating_sub(self.max);
        self.current = total - waste;
        self.wasted_overflow += waste as u64;
        waste
    }

    /// Spend rage; spending more than is held is an invariant violation
    pub fn spend(&mut self, cost: u32) -> Result<(), SimError> {
        if cost > self.current {
            return Err(SimError::InsufficientRage {
                cost,
                held: self.current,
            });
        }
        self.current -= cost;
        self.spent += cost as u64;
        Ok(())
    }

    /// Drop rage above `cap` after a stance swap; returns the amount lost
    pub fn clamp_for_stance_swap(&mut self, cap: u32) -> u32 {
        let waste = self.current.saturating_sub(cap);
        self.current -= waste;
        self.wasted_stance_swap += waste as u64;
        waste
    }
}
