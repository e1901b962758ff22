//! Score to difficulty level mapping and the win condition

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LEVEL, WIN_SCORE};

/// How score maps to a difficulty level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPolicy {
    /// Level `n + 1` once score reaches `thresholds[n]`
    Milestones(Vec<u32>),
    /// One level per `step` points, capped at `max`
    Every { step: u32, max: u8 },
}

impl LevelPolicy {
    /// 20/40/60/80
    pub fn milestones() -> Self {
        LevelPolicy::Milestones(vec![20, 40, 60, 80])
    }

    pub fn every(step: u32) -> Self {
        LevelPolicy::Every {
            step,
            max: MAX_LEVEL,
        }
    }

    /// Level for a score, ignoring history
    pub fn level_for(&self, score: u32) -> u8 {
        match self {
            LevelPolicy::Milestones(thresholds) => {
                let reached = thresholds.iter().filter(|&&t| score >= t).count();
                reached.min(MAX_LEVEL as usize) as u8
            }
            LevelPolicy::Every { step, max } => {
                let level = score / (*step).max(1);
                level.min(*max as u32) as u8
            }
        }
    }
}

/// Result of feeding a new score to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Set when the level went up
    pub new_level: Option<u8>,
    /// Win score reached
    pub cleared: bool,
}

/// Tracks the session's level (never decreases)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionController {
    policy: LevelPolicy,
    level: u8,
    win_score: u32,
}

impl ProgressionController {
    pub fn new(policy: LevelPolicy) -> Self {
        Self {
            policy,
            level: 0,
            win_score: WIN_SCORE,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn win_score(&self) -> u32 {
        self.win_score
    }

    pub fn policy(&self) -> &LevelPolicy {
        &self.policy
    }

    /// Update the level for `score` and report transitions
    pub fn on_score(&mut self, score: u32) -> Progress {
        let target = self.policy.level_for(score);
        let new_level = if target > self.level {
            self.level = target;
            Some(target)
        } else {
            None
        };
        Progress {
            new_level,
            cleared: score >= self.win_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestones() {
        let policy = LevelPolicy::milestones();
        assert_eq!(policy.level_for(0), 0);
        assert_eq!(policy.level_for(19), 0);
        assert_eq!(policy.level_for(20), 1);
        assert_eq!(policy.level_for(45), 2);
        assert_eq!(policy.level_for(60), 3);
        assert_eq!(policy.level_for(80), 4);
        assert_eq!(policy.level_for(1000), 4);
    }

    #[test]
    fn test_every_fifty_caps() {
        let policy = LevelPolicy::every(50);
        assert_eq!(policy.level_for(49), 0);
        assert_eq!(policy.level_for(50), 1);
        assert_eq!(policy.level_for(100), 2);
        assert_eq!(policy.level_for(10_000), MAX_LEVEL);
    }

    #[test]
    fn test_transition_reported_once() {
        let mut controller = ProgressionController::new(LevelPolicy::milestones());
        assert_eq!(controller.on_score(19).new_level, None);
        assert_eq!(controller.on_score(20).new_level, Some(1));
        assert_eq!(controller.on_score(21).new_level, None);
        assert_eq!(controller.level(), 1);
    }

    #[test]
    fn test_jump_several_levels() {
        let mut controller = ProgressionController::new(LevelPolicy::milestones());
        assert_eq!(controller.on_score(65).new_level, Some(3));
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut controller = ProgressionController::new(LevelPolicy::milestones());
        controller.on_score(40);
        controller.on_score(0);
        assert_eq!(controller.level(), 2);
    }

    #[test]
    fn test_win() {
        let mut controller = ProgressionController::new(LevelPolicy::milestones());
        assert!(!controller.on_score(99).cleared);
        assert!(controller.on_score(100).cleared);
        assert!(controller.on_score(103).cleared);
    }
}
