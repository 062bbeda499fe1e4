#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Short-lived visual feedback owned by the session.
//!
//! Timed effects ([`DamageNumber`], [`ImpactEffect`], [`EnemyTrail`]) share a
//! [`Lifetime`] countdown and live in an [`EffectPool`] that drops them on the
//! tick their countdown reaches zero. Ambient particles never expire and live
//! in their own [`ParticleField`]. Floating text fades in two phases inside a
//! [`MessageDisplay`].

mod ambient;
mod message;
mod shake;

use std::num::NonZeroU32;

use echo_defence_core::{EffectTuning, Rgb, TuningError};
use glam::Vec2;
use rand::Rng;
use tracing::trace;

pub use ambient::{BackgroundParticle, ParticleField};
pub use message::{FloatingMessage, MessageDisplay};
pub use shake::ScreenShake;

/// Width of the ring stroked by an [`ImpactEffect`].
pub const IMPACT_STROKE_WIDTH: f32 = 2.0;

/// Upward drift applied to every damage number.
const DAMAGE_NUMBER_RISE: f32 = -2.0;

/// Countdown shared by every timed effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lifetime {
    remaining: u32,
    initial: NonZeroU32,
}

impl Lifetime {
    /// Starts a countdown of `ticks` ticks.
    #[must_use]
    pub const fn new(ticks: NonZeroU32) -> Self {
        Self {
            remaining: ticks.get(),
            initial: ticks,
        }
    }

    /// Consumes one tick. Returns `false` once the countdown is exhausted.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }

    /// Ticks left before expiry.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Ticks the countdown started with.
    #[must_use]
    pub const fn initial(&self) -> u32 {
        self.initial.get()
    }

    /// Remaining share of the lifetime in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.remaining as f32 / self.initial.get() as f32
    }

    /// Opacity proportional to the remaining share of the lifetime.
    #[must_use]
    pub fn alpha(&self) -> u8 {
        (255.0 * self.fraction()).round() as u8
    }
}

/// Floating number shown where an enemy was hit.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageNumber {
    position: Vec2,
    velocity: Vec2,
    value: u32,
    critical: bool,
    font_size: u32,
    lifetime: Lifetime,
}

impl DamageNumber {
    /// Creates a damage number drifting with `velocity`.
    #[must_use]
    pub fn new(
        position: Vec2,
        velocity: Vec2,
        value: u32,
        critical: bool,
        font_size: u32,
        lifetime: Lifetime,
    ) -> Self {
        Self {
            position,
            velocity,
            value,
            critical,
            font_size,
            lifetime,
        }
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Per-tick drift.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Displayed damage.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Whether the hit was critical.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Font size, enlarged for critical hits at creation.
    #[must_use]
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Yellow for critical hits, white otherwise.
    #[must_use]
    pub fn color(&self) -> Rgb {
        if self.critical {
            Rgb::YELLOW
        } else {
            Rgb::WHITE
        }
    }

    fn tick(&mut self) -> bool {
        self.position += self.velocity;
        self.lifetime.tick()
    }
}

/// Expanding ring drawn where an enemy was defeated.
#[derive(Clone, Debug, PartialEq)]
pub struct ImpactEffect {
    position: Vec2,
    color: Rgb,
    max_radius: f32,
    lifetime: Lifetime,
}

impl ImpactEffect {
    /// Creates a ring centred on `position`.
    #[must_use]
    pub fn new(position: Vec2, color: Rgb, max_radius: f32, lifetime: Lifetime) -> Self {
        Self {
            position,
            color,
            max_radius,
            lifetime,
        }
    }

    /// Centre of the ring.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Ring color.
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Radius grows from zero to the maximum as the lifetime depletes.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.max_radius * (1.0 - self.lifetime.fraction())
    }

    /// Stroke width of the ring outline.
    #[must_use]
    pub fn stroke_width(&self) -> f32 {
        IMPACT_STROKE_WIDTH
    }
}

/// Stationary fading square left behind by a moving enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyTrail {
    position: Vec2,
    color: Rgb,
    size: f32,
    lifetime: Lifetime,
}

impl EnemyTrail {
    /// Creates a trail square at the emission point.
    #[must_use]
    pub fn new(position: Vec2, color: Rgb, size: f32, lifetime: Lifetime) -> Self {
        Self {
            position,
            color,
            size,
            lifetime,
        }
    }

    /// Emission point.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Color inherited from the enemy.
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Side length of the square.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }
}

/// Timed effect variants stored in an [`EffectPool`].
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Floating damage readout.
    DamageNumber(DamageNumber),
    /// Expanding impact ring.
    Impact(ImpactEffect),
    /// Fading enemy trail square.
    Trail(EnemyTrail),
}

impl Effect {
    /// Advances the effect by one tick. Returns `false` once it has expired.
    pub fn tick(&mut self) -> bool {
        match self {
            Self::DamageNumber(number) => number.tick(),
            Self::Impact(impact) => impact.lifetime.tick(),
            Self::Trail(trail) => trail.lifetime.tick(),
        }
    }

    /// Countdown of the effect.
    #[must_use]
    pub fn lifetime(&self) -> &Lifetime {
        match self {
            Self::DamageNumber(number) => &number.lifetime,
            Self::Impact(impact) => &impact.lifetime,
            Self::Trail(trail) => &trail.lifetime,
        }
    }

    /// Current opacity.
    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.lifetime().alpha()
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        match self {
            Self::DamageNumber(number) => number.position,
            Self::Impact(impact) => impact.position,
            Self::Trail(trail) => trail.position,
        }
    }
}

/// Exclusive owner of every timed effect.
#[derive(Debug)]
pub struct EffectPool {
    tuning: EffectTuning,
    damage_number_lifetime: NonZeroU32,
    impact_lifetime: NonZeroU32,
    trail_lifetime: NonZeroU32,
    effects: Vec<Effect>,
}

impl EffectPool {
    /// Creates an empty pool, rejecting zero lifetimes.
    pub fn new(tuning: EffectTuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            damage_number_lifetime: positive(
                "effects.damage_number_lifetime",
                tuning.damage_number_lifetime,
            )?,
            impact_lifetime: positive("effects.impact_lifetime", tuning.impact_lifetime)?,
            trail_lifetime: positive("effects.trail_lifetime", tuning.trail_lifetime)?,
            tuning,
            effects: Vec::new(),
        })
    }

    /// Spawns a damage number with a slight random horizontal drift.
    pub fn spawn_damage_number<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        value: u32,
        critical: bool,
        rng: &mut R,
    ) {
        let velocity = Vec2::new(rng.gen_range(-0.5..0.5), DAMAGE_NUMBER_RISE);
        let font_size = if critical {
            self.tuning.damage_number_font_size + self.tuning.critical_font_bonus
        } else {
            self.tuning.damage_number_font_size
        };
        trace!(value, critical, "damage number spawned");
        self.effects.push(Effect::DamageNumber(DamageNumber::new(
            position,
            velocity,
            value,
            critical,
            font_size,
            Lifetime::new(self.damage_number_lifetime),
        )));
    }

    /// Spawns an impact ring.
    pub fn spawn_impact(&mut self, position: Vec2, color: Rgb) {
        self.effects.push(Effect::Impact(ImpactEffect::new(
            position,
            color,
            self.tuning.impact_max_radius,
            Lifetime::new(self.impact_lifetime),
        )));
    }

    /// Spawns a trail square.
    pub fn spawn_trail(&mut self, position: Vec2, color: Rgb, size: f32) {
        self.effects.push(Effect::Trail(EnemyTrail::new(
            position,
            color,
            size,
            Lifetime::new(self.trail_lifetime),
        )));
    }

    /// Ages every effect by one tick and drops the expired ones.
    ///
    /// Survivors are compacted in place, so no effect is skipped when a
    /// neighbour expires. Returns the number of effects removed.
    pub fn tick(&mut self) -> usize {
        let before = self.effects.len();
        self.effects.retain_mut(Effect::tick);
        before - self.effects.len()
    }

    /// Live effects in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Number of live effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Reports whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

fn positive(field: &'static str, ticks: u32) -> Result<NonZeroU32, TuningError> {
    NonZeroU32::new(ticks).ok_or(TuningError::ZeroDuration { field })
}
