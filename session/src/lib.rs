#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session that owns every manager and runs the tick.
//!
//! A [`Session`] is constructed explicitly from a validated [`Tuning`] and a
//! seed, so tests and adapters can create as many isolated sessions as they
//! need. Within a tick the order is fixed: wave scheduling, enemy movement,
//! effect aging, then combo and fever aging. Persistence happens only when an
//! adapter calls [`Session::submit_score`].

use echo_defence_core::{
    Arena, Enemy, EnemyId, Event, Rgb, Tuning, TuningError, WELCOME_BANNER,
};
use echo_defence_leaderboard::{HighScoreManager, LeaderboardError};
use echo_defence_system_effects::{EffectPool, MessageDisplay, ParticleField, ScreenShake};
use echo_defence_system_scoring::{ComboManager, FeverManager};
use echo_defence_system_waves::WaveManager;
use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

const COMBO_TEXT_SIZE: u32 = 24;
const BANNER_TEXT_SIZE: u32 = 36;
const WAVE_TEXT_SIZE: u32 = 48;
const COMBO_TEXT_LIFT: f32 = 20.0;
const BANNER_LIFT: f32 = 50.0;
const FLAVOUR_STREAM: u64 = 1;

/// Single game run: enemies, scoring, and visual feedback.
#[derive(Debug)]
pub struct Session {
    banner: &'static str,
    tuning: Tuning,
    rng: ChaCha8Rng,
    flavour_rng: ChaCha8Rng,
    waves: WaveManager,
    enemies: Vec<Enemy>,
    combo: ComboManager,
    fever: FeverManager,
    effects: EffectPool,
    particles: ParticleField,
    messages: MessageDisplay,
    shake: ScreenShake,
    score: u64,
    tick_index: u64,
}

impl Session {
    /// Validates `tuning` and builds every manager from it.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let particles = ParticleField::new(tuning.arena, tuning.effects.ambient_particles, &mut rng);
        let mut flavour_rng = ChaCha8Rng::seed_from_u64(seed);
        flavour_rng.set_stream(FLAVOUR_STREAM);
        let session = Self {
            banner: WELCOME_BANNER,
            waves: WaveManager::new(tuning.waves.clone(), tuning.arena)?,
            enemies: Vec::new(),
            combo: ComboManager::new(tuning.combo.clone())?,
            fever: FeverManager::new(tuning.fever)?,
            effects: EffectPool::new(tuning.effects)?,
            particles,
            messages: MessageDisplay::new(tuning.messages)?,
            shake: ScreenShake::new(tuning.shake)?,
            score: 0,
            tick_index: 0,
            rng,
            flavour_rng,
            tuning,
        };
        info!(seed, "session created");
        Ok(session)
    }

    /// Starts the next wave and announces it in the middle of the arena.
    pub fn start_next_wave(&mut self, out: &mut Vec<Event>) {
        self.waves.start_next_wave(out);
        let wave = self.waves.current_wave();
        self.messages.add_message(
            format!("Wave {wave}"),
            arena_center(self.tuning.arena),
            Rgb::YELLOW,
            WAVE_TEXT_SIZE,
        );
    }

    /// Advances the simulation by one fixed tick.
    pub fn tick(&mut self, out: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);

        self.waves.update(&mut self.enemies, &mut self.rng, out);
        self.advance_enemies();

        let expired = self.effects.tick();
        if expired > 0 {
            trace!(expired, live = self.effects.len(), "effects expired");
        }
        self.particles.tick();
        self.messages.update();

        if let Some(count) = self.combo.update() {
            debug!(count, "combo broken");
            out.push(Event::ComboBroken { count });
        }
        if self.fever.update() {
            out.push(Event::FeverEnded);
        }
    }

    fn advance_enemies(&mut self) {
        let center = arena_center(self.tuning.arena);
        let emit_trail = self.tick_index % u64::from(self.tuning.effects.trail_interval) == 0;
        for enemy in &mut self.enemies {
            let offset = center - enemy.position;
            let distance = offset.length();
            if distance <= enemy.speed {
                enemy.position = center;
            } else {
                enemy.position += offset / distance * enemy.speed;
            }
            if emit_trail {
                self.effects
                    .spawn_trail(enemy.position, enemy.kind.color(), enemy.kind.radius());
            }
        }
    }

    /// Resolves a successful hit on `enemy` dealing `damage`.
    ///
    /// Removes the enemy, advances the combo and fever meters, awards points,
    /// and spawns the hit feedback. Returns the points awarded, or `None` when
    /// the enemy is not alive.
    pub fn defeat_enemy(
        &mut self,
        enemy: EnemyId,
        damage: f32,
        out: &mut Vec<Event>,
    ) -> Option<u64> {
        let index = self.enemies.iter().position(|live| live.id == enemy)?;
        let defeated = self.enemies.remove(index);
        let position = defeated.position;

        let fever_multiplier = self.fever.damage_multiplier();
        self.combo.add_hit();
        let charge = self.combo.fever_charge_for_hit(self.fever.charge_per_hit());
        let fever_started = self.fever.add_charge(charge);

        let points = defeated.kind.score_value() + self.combo.bonus();
        self.score = self.score.saturating_add(points);

        let critical = self.rng.gen_bool(self.tuning.effects.critical_chance);
        let critical_multiplier = if critical {
            self.tuning.effects.critical_multiplier
        } else {
            1.0
        };
        let shown = (damage * fever_multiplier * critical_multiplier).round() as u32;
        self.effects
            .spawn_damage_number(position, shown, critical, &mut self.rng);
        self.effects.spawn_impact(position, defeated.kind.color());

        let flavour = self.combo.combo_message(&mut self.flavour_rng);
        if !flavour.is_empty() {
            self.messages.add_message(
                flavour.to_owned(),
                position - Vec2::new(0.0, COMBO_TEXT_LIFT),
                Rgb::YELLOW,
                COMBO_TEXT_SIZE,
            );
        }
        let banner_position = arena_center(self.tuning.arena) - Vec2::new(0.0, BANNER_LIFT);
        if let Some(banner) = self.combo.milestone_message() {
            self.messages
                .add_message(banner, banner_position, Rgb::YELLOW, BANNER_TEXT_SIZE);
        }

        if critical {
            self.shake.restart();
        }

        debug!(
            enemy = enemy.get(),
            kind = ?defeated.kind,
            points,
            critical,
            combo = self.combo.count(),
            "enemy defeated"
        );
        out.push(Event::EnemyDefeated {
            enemy,
            kind: defeated.kind,
            points,
            critical,
        });

        if fever_started {
            self.shake.restart();
            self.messages.add_message(
                "FEVER MODE!",
                arena_center(self.tuning.arena),
                Rgb::YELLOW,
                WAVE_TEXT_SIZE,
            );
            out.push(Event::FeverActivated);
        }

        Some(points)
    }

    /// Samples the camera offset for the frame being presented.
    pub fn shake_offset(&mut self) -> IVec2 {
        self.shake.shake(&mut self.rng)
    }

    /// Persists the current score under `name`.
    pub fn submit_score(
        &self,
        name: &str,
        high_scores: &mut HighScoreManager,
    ) -> Result<(), LeaderboardError> {
        info!(name, score = self.score, "submitting score");
        high_scores.save_high_score(name, self.score)
    }
}

fn arena_center(arena: Arena) -> Vec2 {
    Vec2::new(arena.width / 2.0, arena.height / 2.0)
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use super::Session;
    use echo_defence_core::{Enemy, Tuning};
    use echo_defence_system_effects::{EffectPool, MessageDisplay, ParticleField};
    use echo_defence_system_waves::WaveState;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(session: &Session) -> &'static str {
        session.banner
    }

    /// Tuning the session was built from.
    #[must_use]
    pub fn tuning(session: &Session) -> &Tuning {
        &session.tuning
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_index(session: &Session) -> u64 {
        session.tick_index
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(session: &Session) -> u64 {
        session.score
    }

    /// Counters of the wave scheduler.
    #[must_use]
    pub fn wave_state(session: &Session) -> WaveState {
        session.waves.state()
    }

    /// Enemies currently alive, oldest first.
    #[must_use]
    pub fn enemies(session: &Session) -> &[Enemy] {
        &session.enemies
    }

    /// Timed effects currently visible.
    #[must_use]
    pub fn effects(session: &Session) -> &EffectPool {
        &session.effects
    }

    /// Ambient background particles.
    #[must_use]
    pub fn particles(session: &Session) -> &ParticleField {
        &session.particles
    }

    /// Floating text currently visible.
    #[must_use]
    pub fn messages(session: &Session) -> &MessageDisplay {
        &session.messages
    }

    /// Length of the running hit streak.
    #[must_use]
    pub fn combo_count(session: &Session) -> u32 {
        session.combo.count()
    }

    /// Bonus points the next defeat would add.
    #[must_use]
    pub fn combo_bonus(session: &Session) -> u64 {
        session.combo.bonus()
    }

    /// Fever meter fill level in percent.
    #[must_use]
    pub fn charge_percentage(session: &Session) -> f32 {
        session.fever.charge_percentage()
    }

    /// Reports whether fever mode is active.
    #[must_use]
    pub fn fever_active(session: &Session) -> bool {
        session.fever.is_active()
    }

    /// Ticks of fever mode remaining.
    #[must_use]
    pub fn fever_remaining(session: &Session) -> u32 {
        session.fever.remaining()
    }

    /// Reports whether a screen shake burst is in progress.
    #[must_use]
    pub fn is_shaking(session: &Session) -> bool {
        session.shake.is_shaking()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_center_is_half_extent() {
        let center = arena_center(Arena::default());
        assert_eq!(center, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn enemies_never_overshoot_the_center() {
        let mut session = Session::new(Tuning::default(), 1).expect("default tuning");
        session.enemies.push(Enemy {
            id: EnemyId::new(0),
            kind: echo_defence_core::EnemyKind::Basic,
            position: Vec2::new(401.0, 300.0),
            speed: 3.5,
        });
        session.advance_enemies();
        assert_eq!(session.enemies[0].position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn flavour_text_leaves_the_simulation_stream_alone() {
        let mut chained = Session::new(Tuning::default(), 5).expect("default tuning");
        let mut single = Session::new(Tuning::default(), 5).expect("default tuning");
        let mut events = Vec::new();
        for session in [&mut chained, &mut single] {
            session.start_next_wave(&mut events);
            for _ in 0..60 {
                session.tick(&mut events);
            }
        }
        chained.combo.add_hit();

        for session in [&mut chained, &mut single] {
            let id = session.enemies[0].id;
            assert!(session.defeat_enemy(id, 10.0, &mut events).is_some());
        }

        assert_eq!(chained.messages.len(), single.messages.len() + 1);
        assert_eq!(chained.rng.get_word_pos(), single.rng.get_word_pos());
    }
}
