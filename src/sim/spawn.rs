//! Level-driven random spawning
//!
//! Each level has a spawn interval and a probability per kind. A roll walks the
//! cumulative table in declared order (fruit, bomb, potion, poison, magnet,
//! shield, rock); mass left over above the last bound means "spawn nothing".

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::progression::LevelPolicy;
use super::rect::Rect;
use super::registry::{EntityRegistry, ObjectId};
use super::state::{Fruit, Kind};
use crate::consts::{OBJECT_HEIGHT, OBJECT_WIDTH};

/// Spawn interval and per-kind probabilities for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRates {
    pub interval_ms: u32,
    pub fruit: f64,
    pub bomb: f64,
    pub potion: f64,
    pub poison: f64,
    pub magnet: f64,
    pub shield: f64,
    pub rock: f64,
}

impl SpawnRates {
    /// Full game tables, levels 0..=4
    pub const LEVELS: [SpawnRates; 5] = [
        SpawnRates::new(800, [0.6, 0.1, 0.1, 0.0, 0.1, 0.1, 0.0]),
        SpawnRates::new(800, [0.4, 0.1, 0.1, 0.2, 0.1, 0.1, 0.0]),
        SpawnRates::new(600, [0.2, 0.2, 0.1, 0.15, 0.0, 0.1, 0.15]),
        SpawnRates::new(300, [0.2, 0.25, 0.025, 0.2, 0.0, 0.025, 0.2]),
        SpawnRates::new(200, [0.2, 0.3, 0.0, 0.2, 0.0, 0.0, 0.2]),
    ];

    /// Used for any level past the table
    pub const OVERFLOW: SpawnRates =
        SpawnRates::new(1000, [0.5, 0.0, 0.1, 0.1, 0.05, 0.05, 0.25]);

    /// Build from probabilities in declared order
    pub const fn new(interval_ms: u32, p: [f64; 7]) -> Self {
        Self {
            interval_ms,
            fruit: p[0],
            bomb: p[1],
            potion: p[2],
            poison: p[3],
            magnet: p[4],
            shield: p[5],
            rock: p[6],
        }
    }

    /// Table for a level in the full game
    pub fn for_level(level: u8) -> Self {
        Self::LEVELS
            .get(level as usize)
            .copied()
            .unwrap_or(Self::OVERFLOW)
    }

    /// Same table with the power-up columns removed
    pub fn without_power_ups(self) -> Self {
        Self {
            magnet: 0.0,
            shield: 0.0,
            rock: 0.0,
            ..self
        }
    }

    /// Pick a kind for a uniform draw in [0, 1). `fruit` is used if the roll lands on fruit.
    pub fn select(&self, draw: f64, fruit: Fruit) -> Option<Kind> {
        let columns = [
            (Kind::Fruit(fruit), self.fruit),
            (Kind::Bomb, self.bomb),
            (Kind::Potion, self.potion),
            (Kind::Poison, self.poison),
            (Kind::Magnet, self.magnet),
            (Kind::Shield, self.shield),
            (Kind::Rock, self.rock),
        ];
        let mut bound = 0.0;
        for (kind, probability) in columns {
            bound += probability;
            if draw < bound {
                return Some(kind);
            }
        }
        None
    }
}

/// Which entity taxonomy and level policy a session plays with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// All seven kinds, levels at 20/40/60/80 points
    #[default]
    Full,
    /// Fruit, bomb, potion and poison only, a level every 50 points
    Classic,
}

impl Variant {
    pub fn rates(&self, level: u8) -> SpawnRates {
        let rates = SpawnRates::for_level(level);
        match self {
            Variant::Full => rates,
            Variant::Classic => rates.without_power_ups(),
        }
    }

    pub fn level_policy(&self) -> LevelPolicy {
        match self {
            Variant::Full => LevelPolicy::milestones(),
            Variant::Classic => LevelPolicy::every(50),
        }
    }
}

/// Periodic spawner driven by simulated time
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    variant: Variant,
    level: u8,
    rates: SpawnRates,
    /// Time accumulated toward the next roll
    elapsed_ms: u32,
    rng: Pcg32,
}

impl SpawnScheduler {
    pub fn new(variant: Variant, level: u8, seed: u64) -> Self {
        Self {
            variant,
            level,
            rates: variant.rates(level),
            elapsed_ms: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn rates(&self) -> &SpawnRates {
        &self.rates
    }

    /// Switch to a level's table. Replaces the old interval and restarts the countdown.
    pub fn reconfigure(&mut self, level: u8) {
        self.level = level;
        self.rates = self.variant.rates(level);
        self.elapsed_ms = 0;
        log::debug!(
            "Spawner reconfigured for level {} ({} ms)",
            level,
            self.rates.interval_ms
        );
    }

    /// Advance the interval clock, rolling once per elapsed interval.
    /// Returns the ids of objects spawned.
    pub fn update(
        &mut self,
        dt_ms: u32,
        registry: &mut EntityRegistry,
        screen_width: i32,
    ) -> Vec<ObjectId> {
        let mut spawned = Vec::new();
        let interval = self.rates.interval_ms.max(1);
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        while self.elapsed_ms >= interval {
            self.elapsed_ms -= interval;
            spawned.extend(self.tick(registry, screen_width));
        }
        spawned
    }

    /// One roll: maybe add a new object at the top of the screen
    pub fn tick(&mut self, registry: &mut EntityRegistry, screen_width: i32) -> Option<ObjectId> {
        let span = screen_width - OBJECT_WIDTH;
        let x = if span > 0 {
            self.rng.random_range(0..span)
        } else {
            0
        };
        let draw: f64 = self.rng.random();
        let fruit = if draw < self.rates.fruit {
            Fruit::from_index(self.rng.random_range(0..Fruit::ALL.len()))
        } else {
            Fruit::Apple
        };
        let kind = self.rates.select(draw, fruit)?;
        let id = registry.add(kind, Rect::new(x, 0, OBJECT_WIDTH, OBJECT_HEIGHT));
        log::debug!("Spawned {} at x={}", kind.name(), x);
        Some(id)
    }
}
