//! Hippo Catch - a falling-fruit arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, effects, progression)
//! - `audio`: Sound cue ids and the fire-and-forget audio boundary
//! - `renderer`: Read-only frame snapshots and the renderer boundary
//! - `settings`: JSON-backed configuration
//! - `app`: Screen flow and fixed-timestep driver

pub mod app;
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{App, Screen};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~33 Hz)
    pub const TICK_MS: u32 = 30;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default screen dimensions (pixels)
    pub const DEFAULT_SCREEN_WIDTH: i32 = 1280;
    pub const DEFAULT_SCREEN_HEIGHT: i32 = 720;

    /// Player sprite size and placement
    pub const PLAYER_WIDTH: i32 = 200;
    pub const PLAYER_HEIGHT: i32 = 200;
    /// Player top edge sits this far above the bottom of the screen
    pub const PLAYER_BOTTOM_OFFSET: i32 = 330;

    /// Horizontal step per move command
    pub const MOVE_STEP: i32 = 40;
    /// Horizontal step while a rock penalty is active
    pub const PENALIZED_MOVE_STEP: i32 = 4;

    /// Falling object size
    pub const OBJECT_WIDTH: i32 = 60;
    pub const OBJECT_HEIGHT: i32 = 60;
    /// Vertical distance an object falls per tick
    pub const FALL_STEP: i32 = 5;

    /// Health
    pub const MAX_HEALTH: u8 = 100;
    pub const BOMB_DAMAGE: u8 = 20;
    pub const POTION_HEAL: u8 = 15;

    /// Status effect durations (ms)
    pub const PARALYSIS_MS: u32 = 1500;
    pub const ROCK_PENALTY_MS: u32 = 3000;

    /// Score that clears the game
    pub const WIN_SCORE: u32 = 100;
    /// Highest difficulty level
    pub const MAX_LEVEL: u8 = 4;

    /// Walk cycle: ticks per frame and number of frames
    pub const WALK_FRAME_TICKS: u32 = 10;
    pub const WALK_FRAMES: u8 = 2;
}
