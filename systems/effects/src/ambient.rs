use echo_defence_core::{Arena, Rgb, OPAQUE};
use glam::Vec2;
use rand::Rng;
use tracing::debug;

/// Background speck that drifts forever, wrapping across arena edges.
///
/// Unlike the timed effects it has no lifetime and is never removed.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundParticle {
    position: Vec2,
    velocity: Vec2,
    size: u8,
}

impl BackgroundParticle {
    /// Creates a particle at a random position with a small random drift.
    pub fn random<R: Rng + ?Sized>(arena: Arena, rng: &mut R) -> Self {
        Self {
            position: Vec2::new(rng.gen_range(0.0..arena.width), rng.gen_range(0.0..arena.height)),
            velocity: Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)),
            size: rng.gen_range(1..=3),
        }
    }

    /// Creates a particle with explicit motion.
    #[must_use]
    pub fn new(position: Vec2, velocity: Vec2, size: u8) -> Self {
        Self {
            position,
            velocity,
            size,
        }
    }

    /// Centre of the particle.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Per-tick drift.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Side length in pixels.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Ambient particles are always fully opaque.
    #[must_use]
    pub fn alpha(&self) -> u8 {
        OPAQUE
    }

    /// Dim background color.
    #[must_use]
    pub fn color(&self) -> Rgb {
        Rgb::BACKGROUND
    }

    fn tick(&mut self, arena: Arena) {
        self.position += self.velocity;
        let half = f32::from(self.size) / 2.0;
        self.position.x = wrap(self.position.x, half, arena.width);
        self.position.y = wrap(self.position.y, half, arena.height);
    }
}

/// Re-enters from the opposite edge once the particle has fully left the span.
fn wrap(coordinate: f32, half: f32, span: f32) -> f32 {
    if coordinate - half > span {
        -half
    } else if coordinate + half < 0.0 {
        span + half
    } else {
        coordinate
    }
}

/// Fixed population of ambient particles covering the arena.
#[derive(Debug)]
pub struct ParticleField {
    arena: Arena,
    particles: Vec<BackgroundParticle>,
}

impl ParticleField {
    /// Scatters `count` particles across the arena.
    pub fn new<R: Rng + ?Sized>(arena: Arena, count: usize, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| BackgroundParticle::random(arena, rng))
            .collect();
        debug!(count, "ambient particles scattered");
        Self { arena, particles }
    }

    /// Builds a field from explicit particles.
    #[must_use]
    pub fn from_particles(arena: Arena, particles: Vec<BackgroundParticle>) -> Self {
        Self { arena, particles }
    }

    /// Drifts every particle by one tick.
    pub fn tick(&mut self) {
        for particle in &mut self.particles {
            particle.tick(self.arena);
        }
    }

    /// Every particle of the field.
    #[must_use]
    pub fn particles(&self) -> &[BackgroundParticle] {
        &self.particles
    }

    /// Number of particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Reports whether the field holds no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
