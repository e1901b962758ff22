//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt_ms` handed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (by object ID)
//! - No rendering or audio backend dependencies

pub mod effects;
pub mod progression;
pub mod rect;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use effects::{EffectOutcome, apply_effect};
pub use progression::{LevelPolicy, Progress, ProgressionController};
pub use rect::Rect;
pub use registry::{EntityRegistry, ObjectId};
pub use spawn::{SpawnRates, SpawnScheduler, Variant};
pub use state::{
    Facing, FallingObject, Fruit, Kind, MovementState, Phase, Player, Session, SessionConfig,
};
pub use tick::{Command, tick};
pub use timers::{StatusTimer, StatusTimers, TimedEffect};
