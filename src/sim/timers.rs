//! Timed status effects
//!
//! Timers are plain records owned by the session and counted down by the
//! simulated `dt_ms`, so they expire between collision passes and never in
//! the middle of one.

use serde::{Deserialize, Serialize};

/// Effects that wear off on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedEffect {
    /// Poison
    Paralysis,
    /// Rock
    MovementPenalty,
}

/// One pending expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimer {
    pub effect: TimedEffect,
    pub remaining_ms: u32,
}

/// All pending expiries, in start order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimers {
    timers: Vec<StatusTimer>,
}

impl StatusTimers {
    pub fn new() -> Self {
        Self { timers: Vec::new() }
    }

    /// Start a one-shot timer. Existing timers for the same effect keep running.
    pub fn start(&mut self, effect: TimedEffect, duration_ms: u32) {
        self.timers.push(StatusTimer {
            effect,
            remaining_ms: duration_ms,
        });
    }

    /// Count down by `dt_ms`; expired timers are removed and returned once each
    pub fn advance(&mut self, dt_ms: u32) -> Vec<TimedEffect> {
        let mut fired = Vec::new();
        self.timers.retain_mut(|timer| {
            timer.remaining_ms = timer.remaining_ms.saturating_sub(dt_ms);
            if timer.remaining_ms == 0 {
                fired.push(timer.effect);
                false
            } else {
                true
            }
        });
        fired
    }

    /// Soonest expiry for an effect
    pub fn remaining(&self, effect: TimedEffect) -> Option<u32> {
        self.timers
            .iter()
            .filter(|t| t.effect == effect)
            .map(|t| t.remaining_ms)
            .min()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusTimer> {
        self.timers.iter()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
