#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler that paces enemy spawns along an escalating difficulty curve.

use echo_defence_core::{
    Arena, Enemy, EnemyId, EnemyKind, Event, SpawnTable, TuningError, WaveTuning,
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, info};

/// Snapshot of the scheduler's counters, exposed for presentation and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveState {
    /// Number of the most recently started wave, zero before the first.
    pub current_wave: u32,
    /// Spawn quota of the current wave.
    pub enemies_to_spawn: u32,
    /// Enemies spawned so far during the current wave.
    pub spawned_count: u32,
    /// Ticks accumulated since the previous spawn.
    pub spawn_timer: u32,
    /// Whether a wave is in progress.
    pub active: bool,
    /// Speed assigned to enemies spawned during the current wave.
    pub enemy_speed: f32,
}

/// Two-state scheduler: idle between waves, active while a wave spawns or
/// still has enemies on screen.
#[derive(Debug)]
pub struct WaveManager {
    tuning: WaveTuning,
    arena: Arena,
    state: WaveState,
    next_enemy: u32,
}

impl WaveManager {
    /// Creates an idle scheduler, rejecting tuning that could produce empty waves.
    pub fn new(tuning: WaveTuning, arena: Arena) -> Result<Self, TuningError> {
        tuning.validate()?;
        arena.validate()?;
        let enemy_speed = tuning.base_speed;
        Ok(Self {
            tuning,
            arena,
            state: WaveState {
                enemy_speed,
                ..WaveState::default()
            },
            next_enemy: 0,
        })
    }

    /// Current counters of the scheduler.
    #[must_use]
    pub fn state(&self) -> WaveState {
        self.state
    }

    /// Number of the most recently started wave.
    #[must_use]
    pub fn current_wave(&self) -> u32 {
        self.state.current_wave
    }

    /// Reports whether a wave is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Ticks between spawns for the current wave, never below the configured floor.
    #[must_use]
    pub fn spawn_rate(&self) -> u32 {
        let waves_elapsed = self.state.current_wave.saturating_sub(1);
        let reduction = waves_elapsed.saturating_mul(self.tuning.spawn_rate_decrement);
        self.tuning
            .base_spawn_rate
            .saturating_sub(reduction)
            .max(self.tuning.min_spawn_rate)
    }

    /// Advances to the next wave and resets the spawn counters.
    pub fn start_next_wave(&mut self, out: &mut Vec<Event>) {
        let wave = self.state.current_wave.saturating_add(1);
        let waves_elapsed = wave - 1;
        let enemies_to_spawn = self
            .tuning
            .enemies_base
            .saturating_add(waves_elapsed.saturating_mul(self.tuning.enemies_increment));
        let enemy_speed = (self.tuning.base_speed
            + waves_elapsed as f32 * self.tuning.speed_increment)
            .min(self.tuning.max_speed);

        self.state = WaveState {
            current_wave: wave,
            enemies_to_spawn,
            spawned_count: 0,
            spawn_timer: 0,
            active: true,
            enemy_speed,
        };

        info!(wave, enemies = enemies_to_spawn, speed = enemy_speed, "wave started");
        out.push(Event::WaveStarted {
            wave,
            enemies: enemies_to_spawn,
        });
    }

    /// Advances the spawn timer by one tick.
    ///
    /// Spawned enemies are pushed onto `live`. The wave is declared cleared only
    /// once the quota is met *and* `live` is empty, so enemies that are still on
    /// screen keep the wave active after spawning finishes.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        live: &mut Vec<Enemy>,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) {
        if !self.state.active {
            return;
        }

        self.state.spawn_timer = self.state.spawn_timer.saturating_add(1);
        if self.state.spawn_timer >= self.spawn_rate()
            && self.state.spawned_count < self.state.enemies_to_spawn
        {
            self.state.spawn_timer = 0;
            let enemy = self.spawn_enemy(rng);
            debug!(
                wave = self.state.current_wave,
                enemy = enemy.id.get(),
                kind = ?enemy.kind,
                "enemy spawned"
            );
            out.push(Event::EnemySpawned {
                enemy: enemy.id,
                kind: enemy.kind,
            });
            live.push(enemy);
            self.state.spawned_count += 1;
        }

        if self.state.spawned_count >= self.state.enemies_to_spawn && live.is_empty() {
            self.state.active = false;
            info!(wave = self.state.current_wave, "wave cleared");
            out.push(Event::WaveCleared {
                wave: self.state.current_wave,
            });
        }
    }

    fn spawn_enemy<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Enemy {
        let roll: f64 = rng.gen();
        let kind = select_enemy_kind(&self.tuning.spawn_table, self.state.current_wave, roll);
        let position = edge_position(self.arena, kind.radius(), rng);
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.wrapping_add(1);
        Enemy {
            id,
            kind,
            position,
            speed: self.state.enemy_speed,
        }
    }
}

/// Evaluates the selection cascade for a single uniform roll in `[0, 1)`.
///
/// The first rule whose wave gate is open and whose threshold exceeds `roll`
/// wins; otherwise the table's fallback kind is produced.
#[must_use]
pub fn select_enemy_kind(table: &SpawnTable, wave: u32, roll: f64) -> EnemyKind {
    table
        .rules
        .iter()
        .find(|rule| wave >= rule.min_wave && roll < rule.threshold)
        .map_or(table.fallback, |rule| rule.kind)
}

/// Reports the true probability of each kind at `wave`.
///
/// Because the cascade is evaluated in priority order, a rule only claims the
/// part of `[0, threshold)` not already claimed by an earlier open rule. Kinds
/// appear in cascade order, followed by the fallback. Probabilities sum to one.
#[must_use]
pub fn effective_probabilities(table: &SpawnTable, wave: u32) -> Vec<(EnemyKind, f64)> {
    let mut covered = 0.0_f64;
    let mut shares: Vec<(EnemyKind, f64)> = Vec::new();

    for rule in table.rules.iter().filter(|rule| wave >= rule.min_wave) {
        let share = (rule.threshold - covered).max(0.0);
        covered = covered.max(rule.threshold);
        accumulate(&mut shares, rule.kind, share);
    }
    accumulate(&mut shares, table.fallback, 1.0 - covered);
    shares
}

fn accumulate(shares: &mut Vec<(EnemyKind, f64)>, kind: EnemyKind, share: f64) {
    match shares.iter_mut().find(|(existing, _)| *existing == kind) {
        Some((_, total)) => *total += share,
        None => shares.push((kind, share)),
    }
}

fn edge_position<R: Rng + ?Sized>(arena: Arena, radius: f32, rng: &mut R) -> Vec2 {
    match rng.gen_range(0..4) {
        0 => Vec2::new(rng.gen_range(0.0..arena.width), -radius),
        1 => Vec2::new(arena.width + radius, rng.gen_range(0.0..arena.height)),
        2 => Vec2::new(rng.gen_range(0.0..arena.width), arena.height + radius),
        _ => Vec2::new(-radius, rng.gen_range(0.0..arena.height)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn spawn_rate_respects_floor() {
        let mut waves = WaveManager::new(WaveTuning::default(), Arena::default())
            .expect("default tuning");
        let mut events = Vec::new();
        let mut rates = Vec::new();
        for _ in 0..15 {
            waves.start_next_wave(&mut events);
            rates.push(waves.spawn_rate());
        }
        assert_eq!(&rates[..3], &[60, 55, 50]);
        assert_eq!(rates[10], 10);
        assert_eq!(rates[14], 10);
    }

    #[test]
    fn edge_positions_sit_outside_the_arena() {
        let arena = Arena::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let position = edge_position(arena, 15.0, &mut rng);
            let outside = position.x < 0.0
                || position.y < 0.0
                || position.x > arena.width
                || position.y > arena.height;
            assert!(outside, "{position:?} lies inside the arena");
        }
    }

    #[test]
    fn enemy_ids_are_allocated_monotonically() {
        let mut waves = WaveManager::new(WaveTuning::default(), Arena::default())
            .expect("default tuning");
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let first = waves.spawn_enemy(&mut rng);
        let second = waves.spawn_enemy(&mut rng);
        assert!(first.id < second.id);
    }
}
