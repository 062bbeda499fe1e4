use echo_defence_core::{Arena, Enemy, EnemyKind, Event, SpawnTable, WaveTuning};
use echo_defence_system_waves::{effective_probabilities, select_enemy_kind, WaveManager};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn manager() -> WaveManager {
    WaveManager::new(WaveTuning::default(), Arena::default()).expect("default tuning is valid")
}

fn run_ticks(
    waves: &mut WaveManager,
    live: &mut Vec<Enemy>,
    rng: &mut ChaCha8Rng,
    ticks: u32,
) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        waves.update(live, rng, &mut events);
    }
    events
}

#[test]
fn enemy_speed_is_non_decreasing_and_capped() {
    let mut waves = manager();
    let mut events = Vec::new();
    let mut previous = 0.0_f32;

    for _ in 0..40 {
        waves.start_next_wave(&mut events);
        let speed = waves.state().enemy_speed;
        assert!(speed >= previous, "speed dropped from {previous} to {speed}");
        assert!(speed <= 3.5, "speed {speed} exceeds the cap");
        previous = speed;
    }

    assert!((previous - 3.5).abs() < f32::EPSILON);
}

#[test]
fn quota_grows_by_increment_per_wave() {
    let mut waves = manager();
    let mut events = Vec::new();
    let quotas: Vec<u32> = (0..4)
        .map(|_| {
            waves.start_next_wave(&mut events);
            waves.state().enemies_to_spawn
        })
        .collect();

    assert_eq!(quotas, vec![5, 7, 9, 11]);
    assert_eq!(
        events[0],
        Event::WaveStarted {
            wave: 1,
            enemies: 5
        }
    );
}

#[test]
fn idle_scheduler_does_not_spawn() {
    let mut waves = manager();
    let mut live = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let events = run_ticks(&mut waves, &mut live, &mut rng, 500);

    assert!(events.is_empty());
    assert!(live.is_empty());
    assert_eq!(waves.state().spawn_timer, 0);
}

#[test]
fn first_spawn_happens_when_timer_reaches_rate() {
    let mut waves = manager();
    let mut live = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut events = Vec::new();
    waves.start_next_wave(&mut events);

    let _ = run_ticks(&mut waves, &mut live, &mut rng, 59);
    assert!(live.is_empty(), "spawned before the interval elapsed");

    let events = run_ticks(&mut waves, &mut live, &mut rng, 1);
    assert_eq!(live.len(), 1);
    assert_eq!(waves.state().spawned_count, 1);
    assert_eq!(waves.state().spawn_timer, 0);
    assert!(matches!(events[..], [Event::EnemySpawned { .. }]));
    assert!((live[0].speed - 1.5).abs() < f32::EPSILON);
}

#[test]
fn wave_with_survivors_stays_active_after_quota_is_met() {
    let mut waves = manager();
    let mut live = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut events = Vec::new();
    waves.start_next_wave(&mut events);

    let _ = run_ticks(&mut waves, &mut live, &mut rng, 5 * 60);
    assert_eq!(waves.state().spawned_count, 5);
    assert_eq!(live.len(), 5);

    live.truncate(2);
    let events = run_ticks(&mut waves, &mut live, &mut rng, 120);
    assert!(waves.is_active(), "wave completed with two enemies alive");
    assert!(events.is_empty());
    assert_eq!(live.len(), 2, "no spawns beyond the quota");

    live.clear();
    let events = run_ticks(&mut waves, &mut live, &mut rng, 1);
    assert!(!waves.is_active());
    assert_eq!(events, vec![Event::WaveCleared { wave: 1 }]);
}

#[test]
fn cleared_wave_can_be_followed_by_a_faster_one() {
    let mut waves = manager();
    let mut live = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut events = Vec::new();

    waves.start_next_wave(&mut events);
    for _ in 0..=(5 * 60) {
        waves.update(&mut live, &mut rng, &mut events);
        live.clear();
    }
    assert!(!waves.is_active());

    waves.start_next_wave(&mut events);
    assert_eq!(waves.current_wave(), 2);
    assert_eq!(waves.spawn_rate(), 55);
    assert_eq!(waves.state().spawned_count, 0);
    assert!((waves.state().enemy_speed - 1.7).abs() < 1e-5);
}

#[test]
fn cascade_checks_rare_kinds_first() {
    let table = SpawnTable::default();

    assert_eq!(select_enemy_kind(&table, 1, 0.29), EnemyKind::Zigzag);
    assert_eq!(select_enemy_kind(&table, 1, 0.30), EnemyKind::Basic);
    assert_eq!(select_enemy_kind(&table, 2, 0.12), EnemyKind::Zigzag);
    assert_eq!(select_enemy_kind(&table, 3, 0.12), EnemyKind::Ghost);
    assert_eq!(select_enemy_kind(&table, 5, 0.12), EnemyKind::Splitter);
    assert_eq!(select_enemy_kind(&table, 7, 0.07), EnemyKind::Shielded);
    assert_eq!(select_enemy_kind(&table, 8, 0.07), EnemyKind::Healer);
    assert_eq!(select_enemy_kind(&table, 9, 0.04), EnemyKind::Spawner);
    assert_eq!(select_enemy_kind(&table, 10, 0.04), EnemyKind::Disruptor);
}

#[test]
fn charger_is_shadowed_once_splitter_gate_opens() {
    let table = SpawnTable::default();
    for roll in [0.0, 0.05, 0.099] {
        assert_ne!(select_enemy_kind(&table, 5, roll), EnemyKind::Charger);
    }

    let shares = effective_probabilities(&table, 5);
    let share = |kind: EnemyKind| {
        shares
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, share)| *share)
            .expect("kind present")
    };

    assert!((share(EnemyKind::Splitter) - 0.15).abs() < 1e-9);
    assert!(share(EnemyKind::Ghost).abs() < 1e-9);
    assert!(share(EnemyKind::Charger).abs() < 1e-9);
    assert!((share(EnemyKind::Zigzag) - 0.15).abs() < 1e-9);
    assert!((share(EnemyKind::Basic) - 0.70).abs() < 1e-9);
}

#[test]
fn effective_probabilities_sum_to_one() {
    let table = SpawnTable::default();
    for wave in 1..=12 {
        let total: f64 = effective_probabilities(&table, wave)
            .iter()
            .map(|(_, share)| share)
            .sum();
        assert!((total - 1.0).abs() < 1e-9, "wave {wave} sums to {total}");
    }
}

#[test]
fn seeded_runs_spawn_identical_sequences() {
    let spawn_kinds = |seed| {
        let mut waves = manager();
        let mut live = Vec::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut events = Vec::new();
        waves.start_next_wave(&mut events);
        let _ = run_ticks(&mut waves, &mut live, &mut rng, 5 * 60);
        live.into_iter()
            .map(|enemy| (enemy.kind, enemy.position))
            .collect::<Vec<_>>()
    };

    assert_eq!(spawn_kinds(77), spawn_kinds(77));
}
