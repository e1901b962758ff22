//! Rendering boundary
//!
//! The simulation never draws. After every tick (and after screen changes)
//! the app hands a read-only `View` to a `Renderer`.

pub mod terminal;

use std::io;

use serde::{Deserialize, Serialize};

use crate::sim::{FallingObject, Phase, Player, Session, TimedEffect};

pub use terminal::TerminalRenderer;

/// Rules shown on the how-to-play screen
pub const HOW_TO_PLAY: &[&str] = &[
    "Use LEFT and RIGHT to move the hippo.",
    "Catch fruit to gain points.",
    "Avoid bombs: each one costs 20 health.",
    "Catch potions to regain health.",
    "Avoid poison or you will be paralyzed for a moment.",
    "Catch magnets to pull in every fruit on screen.",
    "Catch shields to block one bomb.",
    "Rocks slow you down for a few seconds.",
    "Reach 100 points to clear the game.",
];

/// Read-only copy of everything a frame needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub screen_width: i32,
    pub screen_height: i32,
    pub player: Player,
    pub objects: Vec<FallingObject>,
    pub score: u32,
    pub health: u8,
    /// Also the background index
    pub level: u8,
    pub phase: Phase,
    pub shielded: bool,
    pub paralysis_ms: Option<u32>,
    pub slowdown_ms: Option<u32>,
}

impl Snapshot {
    pub fn of(session: &Session) -> Self {
        Self {
            screen_width: session.config.screen_width,
            screen_height: session.config.screen_height,
            player: session.player.clone(),
            objects: session.objects.iter().cloned().collect(),
            score: session.score,
            health: session.player.health,
            level: session.level(),
            phase: session.phase,
            shielded: session.player.shielded,
            paralysis_ms: session.timers.remaining(TimedEffect::Paralysis),
            slowdown_ms: session.timers.remaining(TimedEffect::MovementPenalty),
        }
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn cleared(&self) -> bool {
        self.phase == Phase::Cleared
    }
}

/// What is on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Home,
    HowToPlay,
    Game(&'a Snapshot),
}

/// Draws frames
pub trait Renderer {
    fn render(&mut self, view: View<'_>) -> io::Result<()>;
}

/// Keeps the last frame instead of drawing it (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub last_screen: Option<&'static str>,
    pub last_snapshot: Option<Snapshot>,
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, view: View<'_>) -> io::Result<()> {
        self.frames += 1;
        self.last_screen = Some(match view {
            View::Home => "home",
            View::HowToPlay => "how-to-play",
            View::Game(snapshot) => {
                self.last_snapshot = Some(snapshot.clone());
                "game"
            }
        });
        Ok(())
    }
}
