//! Chasing-light spin
//!
//! A spin is decided the moment it starts: the total step count fixes the
//! landing slot. The per-step delays only pace the animation.

use serde::{Deserialize, Serialize};

use super::board::advance_index;
use super::dice::{Dice, Draw};
use crate::consts::*;

/// Result of advancing a spin by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinStep {
    /// Light moved; next step is due after `delay_ms`
    Moving { index: usize, delay_ms: u32 },
    /// Final step taken; the light rests on `index`
    Landed { index: usize },
}

/// An in-progress spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRun {
    pub start: usize,
    pub total_steps: u32,
    pub taken: u32,
    pub delay_ms: u32,
}

impl SpinRun {
    pub fn new(start: usize, total_steps: u32) -> Self {
        Self {
            start,
            total_steps: total_steps.max(1),
            taken: 0,
            delay_ms: SPIN_BASE_DELAY_MS,
        }
    }

    /// Draw a fresh spin length starting at `start`
    pub fn draw(start: usize, dice: &mut impl Dice) -> Self {
        let extra = dice.draw(Draw::SpinSteps, 0..u64::from(SPIN_STEP_SPREAD));
        Self::new(start, SPIN_BASE_STEPS + extra as u32)
    }

    /// Where the light will come to rest
    pub fn landing(&self) -> usize {
        advance_index(self.start, self.total_steps)
    }

    /// Light position after the steps taken so far
    pub fn current(&self) -> usize {
        advance_index(self.start, self.taken)
    }

    pub fn is_done(&self) -> bool {
        self.taken >= self.total_steps
    }

    /// Move the light one slot and work out the next delay
    pub fn step(&mut self) -> SpinStep {
        self.taken += 1;
        let index = self.current();
        if self.is_done() {
            return SpinStep::Landed { index };
        }

        // Both slowdowns accumulate on every step once active
        if self.taken > SPIN_SLOWDOWN_AFTER {
            self.delay_ms += SPIN_SLOWDOWN_MS;
        }
        if self.taken + SPIN_BRAKE_WINDOW > self.total_steps {
            self.delay_ms += SPIN_BRAKE_MS;
        }
        SpinStep::Moving {
            index,
            delay_ms: self.delay_ms,
        }
    }

    /// Total animation time from the first step to the landing
    pub fn duration_ms(&self) -> u64 {
        let mut probe = Self::new(self.start, self.total_steps);
        let mut total = 0u64;
        while let SpinStep::Moving { delay_ms, .. } = probe.step() {
            total += u64::from(delay_ms);
        }
        total
    }
}
