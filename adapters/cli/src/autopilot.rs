use echo_defence_core::Event;
use echo_defence_session::{query, Session};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ECHO_DAMAGE: f32 = 10.0;

/// Scripted player that keeps waves flowing and shoots the oldest enemy.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    hit_chance: f64,
}

impl Autopilot {
    /// Creates an autopilot whose decisions are seeded independently of the session.
    pub(crate) fn new(seed: u64, hit_chance: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            hit_chance,
        }
    }

    /// Plays one tick. Returns whether an echo burst was fired.
    pub(crate) fn step(&mut self, session: &mut Session, out: &mut Vec<Event>) -> bool {
        if !query::wave_state(session).active {
            session.start_next_wave(out);
        }
        session.tick(out);

        let Some(target) = query::enemies(session).first().map(|enemy| enemy.id) else {
            return false;
        };
        if !self.rng.gen_bool(self.hit_chance) {
            return false;
        }
        let _ = session.defeat_enemy(target, ECHO_DAMAGE, out);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_defence_core::Tuning;

    #[test]
    fn certain_hits_clear_waves_back_to_back() {
        let mut session = Session::new(Tuning::default(), 3).expect("default tuning");
        let mut autopilot = Autopilot::new(3, 1.0);
        let mut events = Vec::new();

        for _ in 0..2_000 {
            let _ = autopilot.step(&mut session, &mut events);
        }

        let cleared = events
            .iter()
            .filter(|event| matches!(event, Event::WaveCleared { .. }))
            .count();
        assert!(cleared >= 3, "only {cleared} waves cleared");
        assert!(query::score(&session) > 0);
    }

    #[test]
    fn zero_hit_chance_never_fires() {
        let mut session = Session::new(Tuning::default(), 4).expect("default tuning");
        let mut autopilot = Autopilot::new(4, 0.0);
        let mut events = Vec::new();

        for _ in 0..500 {
            assert!(!autopilot.step(&mut session, &mut events));
        }
        assert_eq!(query::score(&session), 0);
    }
}
