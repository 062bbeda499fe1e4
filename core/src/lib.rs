#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Echo Defence simulation.
//!
//! This crate defines the vocabulary that connects the pure systems (waves,
//! scoring, effects), the session that owns them, and the adapters that
//! drive a session. Systems mutate only their own state and report notable
//! transitions as [`Event`] values; adapters translate those events into
//! sound cues, logs, or presentation updates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod tuning;

pub use tuning::{
    Arena, ComboTuning, EffectTuning, FeverTuning, MessageTuning, ShakeTuning, SpawnRule,
    SpawnTable, Tuning, TuningError, WaveTuning,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Echo Defence.";

/// Opaque alpha value used by entities that never fade.
pub const OPAQUE: u8 = u8::MAX;

/// Byte RGB color carried by enemies and visual feedback entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Pure white, used for regular damage numbers.
    pub const WHITE: Self = Self::from_rgb(0xff, 0xff, 0xff);
    /// Bright yellow, used for critical hits and banner messages.
    pub const YELLOW: Self = Self::from_rgb(0xff, 0xff, 0x00);
    /// Dim blue used by the ambient background particles.
    pub const BACKGROUND: Self = Self::from_rgb(0x1a, 0x2e, 0x4a);

    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Enemy archetypes the wave scheduler can instantiate.
///
/// Rarer kinds are gated behind later waves by the spawn table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Common enemy that heads straight for the core.
    Basic,
    /// Weaves side to side while approaching.
    Zigzag,
    /// Phases in and out, requiring repeated hits.
    Ghost,
    /// Pauses and then lunges at high speed.
    Charger,
    /// Breaks into smaller enemies when defeated.
    Splitter,
    /// Carries a shield that absorbs the first hits.
    Shielded,
    /// Restores health to nearby enemies.
    Healer,
    /// Periodically releases additional enemies.
    Spawner,
    /// Interferes with the player's echo waves.
    Disruptor,
}

impl EnemyKind {
    /// Every enemy kind, ordered from most common to rarest.
    pub const ALL: [Self; 9] = [
        Self::Basic,
        Self::Zigzag,
        Self::Ghost,
        Self::Charger,
        Self::Splitter,
        Self::Shielded,
        Self::Healer,
        Self::Spawner,
        Self::Disruptor,
    ];

    /// Base points awarded when an enemy of this kind is defeated.
    #[must_use]
    pub const fn score_value(self) -> u64 {
        match self {
            Self::Basic => 1,
            Self::Zigzag | Self::Splitter => 2,
            Self::Ghost | Self::Charger => 3,
            Self::Shielded | Self::Healer => 4,
            Self::Spawner => 5,
            Self::Disruptor => 6,
        }
    }

    /// Body color used for the enemy, its trail, and its impact ring.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Basic => Rgb::from_rgb(0xff, 0x00, 0x55),
            Self::Zigzag => Rgb::from_rgb(0x00, 0xc8, 0x00),
            Self::Ghost => Rgb::from_rgb(0x96, 0x96, 0xff),
            Self::Charger => Rgb::from_rgb(0xff, 0x64, 0x00),
            Self::Splitter => Rgb::from_rgb(0xff, 0x00, 0xff),
            Self::Shielded => Rgb::from_rgb(0x64, 0xc8, 0xff),
            Self::Healer => Rgb::from_rgb(0x32, 0xff, 0x96),
            Self::Spawner => Rgb::from_rgb(0xff, 0xd7, 0x00),
            Self::Disruptor => Rgb::from_rgb(0x8a, 0x2b, 0xe2),
        }
    }

    /// Collision radius of the enemy body in world units.
    #[must_use]
    pub const fn radius(self) -> f32 {
        15.0
    }
}

/// Unique identifier assigned to a spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Live enemy record stored in the session's enemy collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Identifier allocated by the wave scheduler.
    pub id: EnemyId,
    /// Archetype selected by the spawn table.
    pub kind: EnemyKind,
    /// Current position in world units.
    pub position: Vec2,
    /// Distance travelled per tick, fixed at spawn from the wave's speed.
    pub speed: f32,
}

/// Notable transitions reported by systems during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new wave became active.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Number of enemies the wave will spawn.
        enemies: u32,
    },
    /// The wave scheduler added an enemy to the live collection.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype chosen by the spawn table.
        kind: EnemyKind,
    },
    /// Every enemy of the wave was spawned and removed.
    WaveCleared {
        /// Wave number that completed.
        wave: u32,
    },
    /// An enemy was defeated through the collision entry point.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Archetype of the defeated enemy.
        kind: EnemyKind,
        /// Points added to the score, combo bonus included.
        points: u64,
        /// Whether the hit rolled a critical.
        critical: bool,
    },
    /// The hit streak expired.
    ComboBroken {
        /// Length of the streak that ended.
        count: u32,
    },
    /// Fever charge crossed the threshold.
    FeverActivated,
    /// The fever timer ran out.
    FeverEnded,
}
