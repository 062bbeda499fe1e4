//! Tunable numeric policy for every system, loaded from configuration files.
//!
//! Each section derives `Deserialize` with `#[serde(default)]`, so a partial
//! file only overrides the keys it names. Values are checked once by
//! [`Tuning::validate`]; systems re-validate their own section when they are
//! constructed so that invariant violations never surface mid-tick.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::EnemyKind;

/// Complete tuning tree consumed by the session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playable area dimensions.
    pub arena: Arena,
    /// Wave cadence and difficulty curve.
    pub waves: WaveTuning,
    /// Hit-streak accumulator.
    pub combo: ComboTuning,
    /// Charge-and-release burst mode.
    pub fever: FeverTuning,
    /// Timed visual feedback entities.
    pub effects: EffectTuning,
    /// Floating text messages.
    pub messages: MessageTuning,
    /// Screen shake bursts.
    pub shake: ShakeTuning,
}

impl Tuning {
    /// Checks every section, returning the first violated invariant.
    pub fn validate(&self) -> Result<(), TuningError> {
        self.arena.validate()?;
        self.waves.validate()?;
        self.combo.validate()?;
        self.fever.validate()?;
        self.effects.validate()?;
        self.messages.validate()?;
        self.shake.validate()
    }
}

/// Playable area dimensions in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Arena {
    /// Ensures both dimensions are finite and positive.
    pub fn validate(&self) -> Result<(), TuningError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(TuningError::EmptyArena {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Wave sizing, pacing, and enemy selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Enemies spawned by the first wave.
    pub enemies_base: u32,
    /// Additional enemies per subsequent wave.
    pub enemies_increment: u32,
    /// Enemy speed during the first wave.
    pub base_speed: f32,
    /// Speed added per subsequent wave.
    pub speed_increment: f32,
    /// Upper bound on enemy speed.
    pub max_speed: f32,
    /// Ticks between spawns during the first wave.
    pub base_spawn_rate: u32,
    /// Ticks removed from the spawn interval per subsequent wave.
    pub spawn_rate_decrement: u32,
    /// Floor applied to the spawn interval.
    pub min_spawn_rate: u32,
    /// Ordered enemy selection cascade.
    pub spawn_table: SpawnTable,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            enemies_base: 5,
            enemies_increment: 2,
            base_speed: 1.5,
            speed_increment: 0.2,
            max_speed: 3.5,
            base_spawn_rate: 60,
            spawn_rate_decrement: 5,
            min_spawn_rate: 10,
            spawn_table: SpawnTable::default(),
        }
    }
}

impl WaveTuning {
    /// Ensures waves are non-empty, speeds are ordered, and the table is well formed.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.enemies_base == 0 {
            return Err(TuningError::ZeroEnemiesPerWave);
        }
        if !(self.base_speed.is_finite() && self.base_speed > 0.0)
            || !self.max_speed.is_finite()
            || self.max_speed < self.base_speed
        {
            return Err(TuningError::SpeedRange {
                base: self.base_speed,
                max: self.max_speed,
            });
        }
        if !(self.speed_increment.is_finite() && self.speed_increment >= 0.0) {
            return Err(TuningError::InvalidValue {
                field: "waves.speed_increment",
                value: f64::from(self.speed_increment),
            });
        }
        if self.min_spawn_rate == 0 || self.min_spawn_rate > self.base_spawn_rate {
            return Err(TuningError::SpawnRateFloor {
                floor: self.min_spawn_rate,
                base: self.base_spawn_rate,
            });
        }
        self.spawn_table.validate()
    }
}

/// One gated entry of the enemy selection cascade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    /// First wave at which the rule is eligible.
    pub min_wave: u32,
    /// The rule wins when the roll falls strictly below this value.
    pub threshold: f64,
    /// Enemy produced when the rule wins.
    pub kind: EnemyKind,
}

impl SpawnRule {
    /// Creates a rule gated at `min_wave`.
    #[must_use]
    pub const fn new(min_wave: u32, threshold: f64, kind: EnemyKind) -> Self {
        Self {
            min_wave,
            threshold,
            kind,
        }
    }
}

/// Priority-ordered enemy selection cascade with a common fallback.
///
/// Rules are evaluated first to last against a single roll. The order is a
/// contract: the rarest kinds come first and the common kinds last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTable {
    /// Rules in evaluation order.
    pub rules: Vec<SpawnRule>,
    /// Kind produced when no rule matches.
    pub fallback: EnemyKind,
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self {
            rules: vec![
                SpawnRule::new(10, 0.05, EnemyKind::Disruptor),
                SpawnRule::new(9, 0.05, EnemyKind::Spawner),
                SpawnRule::new(8, 0.08, EnemyKind::Healer),
                SpawnRule::new(7, 0.10, EnemyKind::Shielded),
                SpawnRule::new(5, 0.15, EnemyKind::Splitter),
                SpawnRule::new(3, 0.15, EnemyKind::Ghost),
                SpawnRule::new(5, 0.10, EnemyKind::Charger),
                SpawnRule::new(1, 0.30, EnemyKind::Zigzag),
            ],
            fallback: EnemyKind::Basic,
        }
    }
}

impl SpawnTable {
    /// Ensures every threshold lies within `[0, 1]`.
    pub fn validate(&self) -> Result<(), TuningError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if !(0.0..=1.0).contains(&rule.threshold) {
                return Err(TuningError::ThresholdOutOfRange {
                    index,
                    threshold: rule.threshold,
                });
            }
        }
        Ok(())
    }
}

/// Hit-streak decay and bonus policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboTuning {
    /// Ticks a streak survives without a new hit.
    pub decay_window: u32,
    /// Bonus points per hit in the streak, floored.
    pub bonus_multiplier: f64,
    /// Flavour text shown while a streak is running.
    pub messages: Vec<String>,
    /// Streak length from which hits feed extra fever charge.
    pub fever_boost_at: u32,
    /// Extra fever charge per hit once the boost applies.
    pub fever_boost: f32,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self {
            decay_window: 90,
            bonus_multiplier: 0.1,
            messages: ["Nice!", "Great!", "Awesome!", "Amazing!", "Incredible!"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            fever_boost_at: 5,
            fever_boost: 2.0,
        }
    }
}

impl ComboTuning {
    /// Ensures the streak can decay and the flavour set is usable.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.decay_window == 0 {
            return Err(TuningError::ZeroDuration {
                field: "combo.decay_window",
            });
        }
        non_negative("combo.bonus_multiplier", self.bonus_multiplier)?;
        non_negative("combo.fever_boost", self.fever_boost)?;
        if self.messages.is_empty() {
            return Err(TuningError::EmptyComboMessages);
        }
        Ok(())
    }
}

/// Fever charge and burst policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeverTuning {
    /// Charge required to activate fever.
    pub threshold: f32,
    /// Ticks fever stays active.
    pub duration: u32,
    /// Charge granted per successful hit.
    pub charge_per_hit: f32,
    /// Damage multiplier applied while fever is active.
    pub damage_multiplier: f32,
}

impl Default for FeverTuning {
    fn default() -> Self {
        Self {
            threshold: 100.0,
            duration: 300,
            charge_per_hit: 5.0,
            damage_multiplier: 2.0,
        }
    }
}

impl FeverTuning {
    /// Ensures the threshold is reachable and fever has a duration.
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(TuningError::FeverThreshold(self.threshold));
        }
        if self.duration == 0 {
            return Err(TuningError::ZeroDuration {
                field: "fever.duration",
            });
        }
        non_negative("fever.charge_per_hit", self.charge_per_hit)?;
        non_negative("fever.damage_multiplier", self.damage_multiplier)
    }
}

/// Lifetimes and sizes of timed visual feedback.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    /// Ticks a damage number floats before vanishing.
    pub damage_number_lifetime: u32,
    /// Font size of regular damage numbers.
    pub damage_number_font_size: u32,
    /// Extra font size for critical hits.
    pub critical_font_bonus: u32,
    /// Probability that a defeat counts as a critical hit.
    pub critical_chance: f64,
    /// Damage multiplier for critical hits.
    pub critical_multiplier: f32,
    /// Ticks an impact ring stays visible.
    pub impact_lifetime: u32,
    /// Radius an impact ring reaches as it expires.
    pub impact_max_radius: f32,
    /// Ticks a trail square stays visible.
    pub trail_lifetime: u32,
    /// Ticks between trail squares left by a moving enemy.
    pub trail_interval: u32,
    /// Number of ambient background particles.
    pub ambient_particles: usize,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            damage_number_lifetime: 60,
            damage_number_font_size: 24,
            critical_font_bonus: 10,
            critical_chance: 0.1,
            critical_multiplier: 2.0,
            impact_lifetime: 10,
            impact_max_radius: 20.0,
            trail_lifetime: 30,
            trail_interval: 6,
            ambient_particles: 50,
        }
    }
}

impl EffectTuning {
    /// Ensures every timed effect has a positive lifetime.
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("effects.damage_number_lifetime", self.damage_number_lifetime),
            ("effects.impact_lifetime", self.impact_lifetime),
            ("effects.trail_lifetime", self.trail_lifetime),
            ("effects.trail_interval", self.trail_interval),
        ] {
            if value == 0 {
                return Err(TuningError::ZeroDuration { field });
            }
        }
        if !(0.0..=1.0).contains(&self.critical_chance) {
            return Err(TuningError::InvalidValue {
                field: "effects.critical_chance",
                value: self.critical_chance,
            });
        }
        non_negative("effects.critical_multiplier", self.critical_multiplier)?;
        non_negative("effects.impact_max_radius", self.impact_max_radius)
    }
}

/// Two-phase decay of floating messages.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTuning {
    /// Ticks a message holds at full opacity.
    pub hold_ticks: u32,
    /// Alpha removed per tick once the hold expires.
    pub fade_per_tick: u8,
}

impl Default for MessageTuning {
    fn default() -> Self {
        Self {
            hold_ticks: 90,
            fade_per_tick: 5,
        }
    }
}

impl MessageTuning {
    /// Ensures messages eventually fade out.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.fade_per_tick == 0 {
            return Err(TuningError::ZeroDuration {
                field: "messages.fade_per_tick",
            });
        }
        Ok(())
    }
}

/// Screen shake burst parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeTuning {
    /// Largest offset in either axis.
    pub intensity: i32,
    /// Number of shaken frames per burst.
    pub duration: u32,
}

impl Default for ShakeTuning {
    fn default() -> Self {
        Self {
            intensity: 5,
            duration: 20,
        }
    }
}

impl ShakeTuning {
    /// Ensures the intensity range is well formed.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.intensity < 0 {
            return Err(TuningError::InvalidValue {
                field: "shake.intensity",
                value: f64::from(self.intensity),
            });
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: impl Into<f64>) -> Result<(), TuningError> {
    let value = value.into();
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::InvalidValue { field, value })
    }
}

/// Reasons a tuning tree is rejected at construction time.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TuningError {
    /// The arena has a non-positive or non-finite dimension.
    #[error("arena must have positive dimensions, got {width}x{height}")]
    EmptyArena {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// The first wave would spawn nothing.
    #[error("waves.enemies_base must be at least 1")]
    ZeroEnemiesPerWave,
    /// Speeds are non-positive, non-finite, or capped below the base.
    #[error("enemy speed must satisfy 0 < base ({base}) <= max ({max})")]
    SpeedRange {
        /// Configured base speed.
        base: f32,
        /// Configured maximum speed.
        max: f32,
    },
    /// The spawn interval floor is zero or above the base interval.
    #[error("spawn rate floor {floor} must lie within 1..={base}")]
    SpawnRateFloor {
        /// Configured floor.
        floor: u32,
        /// Configured base interval.
        base: u32,
    },
    /// A spawn rule threshold lies outside `[0, 1]`.
    #[error("spawn rule {index} has threshold {threshold} outside [0, 1]")]
    ThresholdOutOfRange {
        /// Position of the rule in the cascade.
        index: usize,
        /// Offending threshold.
        threshold: f64,
    },
    /// A timer or lifetime that must count down from a positive value is zero.
    #[error("{field} must be greater than zero")]
    ZeroDuration {
        /// Dotted path of the offending key.
        field: &'static str,
    },
    /// The fever threshold is non-positive or non-finite.
    #[error("fever threshold must be positive, got {0}")]
    FeverThreshold(f32),
    /// A multiplier, chance, or size is negative or non-finite.
    #[error("{field} has invalid value {value}")]
    InvalidValue {
        /// Dotted path of the offending key.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// No flavour text is available for running combos.
    #[error("combo.messages must not be empty")]
    EmptyComboMessages,
}
