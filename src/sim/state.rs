//! Game state and core simulation types
//!
//! A `Session` is one playthrough. It exclusively owns the player, the live
//! falling objects, the status timers and the spawn scheduler; starting a new
//! game builds a fresh `Session` and drops the old one.

use serde::{Deserialize, Serialize};

use super::progression::ProgressionController;
use super::rect::Rect;
use super::registry::{EntityRegistry, ObjectId};
use super::spawn::{SpawnScheduler, Variant};
use super::timers::StatusTimers;
use crate::consts::*;

/// Terminal/non-terminal state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Ticks are accepted
    Playing,
    /// Health ran out
    GameOver,
    /// Win score reached
    Cleared,
}

/// Which way the hippo sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Player animation / control state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Idle,
    Walking,
    MouthOpen,
    Paralyzed,
}

/// Fruit variants (sprite selection only, all score the same)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fruit {
    Apple,
    Watermelon,
    Banana,
    Pineapple,
    Mango,
}

impl Fruit {
    pub const ALL: [Fruit; 5] = [
        Fruit::Apple,
        Fruit::Watermelon,
        Fruit::Banana,
        Fruit::Pineapple,
        Fruit::Mango,
    ];

    /// Variant for an index in 0..5 (wraps out-of-range indices)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Category of a falling object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    Fruit(Fruit),
    Bomb,
    Potion,
    Poison,
    Magnet,
    Shield,
    Rock,
}

impl Kind {
    pub fn is_fruit(&self) -> bool {
        matches!(self, Kind::Fruit(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Fruit(_) => "fruit",
            Kind::Bomb => "bomb",
            Kind::Potion => "potion",
            Kind::Poison => "poison",
            Kind::Magnet => "magnet",
            Kind::Shield => "shield",
            Kind::Rock => "rock",
        }
    }
}

/// A falling object entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: ObjectId,
    pub kind: Kind,
    pub rect: Rect,
}

impl FallingObject {
    /// Move down by `step` pixels
    pub fn fall(&mut self, step: i32) {
        self.rect.pos.y += step;
    }
}

/// The hippo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Always within 0..=MAX_HEALTH
    pub health: u8,
    pub facing: Facing,
    pub movement: MovementState,
    /// Walk cycle frame (0..WALK_FRAMES)
    pub animation_frame: u8,
    /// Ticks spent on the current walk frame
    pub animation_timer: u32,
    pub paralyzed: bool,
    /// Absorbs the next bomb
    pub shielded: bool,
    /// Rock penalty: movement step reduced
    pub movement_penalized: bool,
}

impl Player {
    /// Spawn the hippo centred near the bottom of the screen
    pub fn new(screen_width: i32, screen_height: i32) -> Self {
        let x = (screen_width / 2 - PLAYER_WIDTH / 2).max(0);
        let y = (screen_height - PLAYER_BOTTOM_OFFSET).max(0);
        Self {
            rect: Rect::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            health: MAX_HEALTH,
            facing: Facing::Right,
            movement: MovementState::Idle,
            animation_frame: 0,
            animation_timer: 0,
            paralyzed: false,
            shielded: false,
            movement_penalized: false,
        }
    }

    /// Current horizontal step for one move command
    pub fn move_step(&self) -> i32 {
        if self.movement_penalized {
            PENALIZED_MOVE_STEP
        } else {
            MOVE_STEP
        }
    }

    /// Shift horizontally, clamped to the screen. No-op while paralyzed.
    pub fn walk(&mut self, facing: Facing, screen_width: i32) {
        if self.paralyzed {
            return;
        }
        let step = self.move_step();
        let dx = match facing {
            Facing::Left => -step,
            Facing::Right => step,
        };
        let max_x = (screen_width - self.rect.size.x).max(0);
        self.rect.pos.x = (self.rect.pos.x + dx).clamp(0, max_x);
        self.facing = facing;
        self.movement = MovementState::Walking;
    }

    /// Key released / input idle
    pub fn stop_walking(&mut self) {
        if !self.paralyzed {
            self.movement = MovementState::Idle;
        }
    }

    /// Apply damage, returns remaining health
    pub fn damage(&mut self, amount: u8) -> u8 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    /// Heal, capped at MAX_HEALTH
    pub fn heal(&mut self, amount: u8) {
        self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
    }

    pub fn paralyze(&mut self) {
        self.paralyzed = true;
        self.movement = MovementState::Paralyzed;
    }

    /// Lift paralysis and return to idle
    pub fn recover(&mut self) {
        self.paralyzed = false;
        self.movement = MovementState::Idle;
    }

    /// Open mouth after eating (paralysis wins over the eating pose)
    pub fn open_mouth(&mut self) {
        if !self.paralyzed {
            self.movement = MovementState::MouthOpen;
        }
    }

    /// Advance the walk cycle by one tick
    pub fn animate(&mut self) {
        if self.movement != MovementState::Walking {
            return;
        }
        self.animation_timer += 1;
        if self.animation_timer >= WALK_FRAME_TICKS {
            self.animation_frame = (self.animation_frame + 1) % WALK_FRAMES;
            self.animation_timer = 0;
        }
    }
}

/// Fixed per-session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub variant: Variant,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            variant: Variant::Full,
        }
    }
}

/// One playthrough
#[derive(Debug, Clone)]
pub struct Session {
    pub config: SessionConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub player: Player,
    pub objects: EntityRegistry,
    pub timers: StatusTimers,
    pub progression: ProgressionController,
    pub scheduler: SpawnScheduler,
    pub score: u32,
    pub phase: Phase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated milliseconds elapsed
    pub time_ms: u64,
}

impl Session {
    /// Start a fresh session
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        let progression = ProgressionController::new(config.variant.level_policy());
        let scheduler = SpawnScheduler::new(config.variant, progression.level(), seed);
        log::info!(
            "New session: {}x{}, {:?} variant, seed {}",
            config.screen_width,
            config.screen_height,
            config.variant,
            seed
        );
        Self {
            config,
            seed,
            player: Player::new(config.screen_width, config.screen_height),
            objects: EntityRegistry::new(),
            timers: StatusTimers::new(),
            progression,
            scheduler,
            score: 0,
            phase: Phase::Playing,
            time_ticks: 0,
            time_ms: 0,
        }
    }

    /// Current difficulty level (0..=MAX_LEVEL)
    pub fn level(&self) -> u8 {
        self.progression.level()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase != Phase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_cleared(&self) -> bool {
        self.phase == Phase::Cleared
    }

    /// Place an object directly, bypassing the spawn scheduler
    pub fn spawn(&mut self, kind: Kind, x: i32, y: i32) -> ObjectId {
        self.objects
            .add(kind, Rect::new(x, y, OBJECT_WIDTH, OBJECT_HEIGHT))
    }
}
