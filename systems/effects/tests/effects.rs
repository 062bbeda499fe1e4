use echo_defence_core::{Arena, EffectTuning, MessageTuning, Rgb, ShakeTuning, OPAQUE};
use echo_defence_system_effects::{
    BackgroundParticle, Effect, EffectPool, MessageDisplay, ParticleField, ScreenShake,
};
use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn pool() -> EffectPool {
    EffectPool::new(EffectTuning::default()).expect("default tuning is valid")
}

fn alpha_trace(mut pool: EffectPool) -> Vec<u8> {
    let mut alphas = Vec::new();
    loop {
        let Some(alpha) = pool.iter().next().map(Effect::alpha) else {
            break;
        };
        alphas.push(alpha);
        let _ = pool.tick();
    }
    alphas
}

#[test]
fn timed_effects_fade_monotonically_until_removed() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let origin = Vec2::new(100.0, 100.0);

    let mut numbers = pool();
    numbers.spawn_damage_number(origin, 12, false, &mut rng);
    let mut impacts = pool();
    impacts.spawn_impact(origin, Rgb::WHITE);
    let mut trails = pool();
    trails.spawn_trail(origin, Rgb::WHITE, 15.0);

    for (pool, lifetime) in [(numbers, 60), (impacts, 10), (trails, 30)] {
        let alphas = alpha_trace(pool);
        assert_eq!(alphas.len(), lifetime, "effect outlived its lifetime");
        assert_eq!(alphas[0], OPAQUE);
        assert!(alphas.windows(2).all(|pair| pair[1] <= pair[0]));
    }
}

#[test]
fn damage_number_rises_with_small_horizontal_drift() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut pool = pool();
    pool.spawn_damage_number(Vec2::new(50.0, 300.0), 7, false, &mut rng);

    for _ in 0..10 {
        let _ = pool.tick();
    }

    let Some(Effect::DamageNumber(number)) = pool.iter().next() else {
        panic!("damage number expired early");
    };
    assert!((number.position().y - 280.0).abs() < 1e-4);
    assert!(number.velocity().x.abs() <= 0.5);
    assert_eq!(number.value(), 7);
    assert_eq!(number.color(), Rgb::WHITE);
    assert_eq!(number.font_size(), 24);
}

#[test]
fn critical_damage_numbers_are_larger_and_yellow() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut pool = pool();
    pool.spawn_damage_number(Vec2::ZERO, 40, true, &mut rng);

    let Some(Effect::DamageNumber(number)) = pool.iter().next() else {
        panic!("damage number missing");
    };
    assert!(number.is_critical());
    assert_eq!(number.font_size(), 34);
    assert_eq!(number.color(), Rgb::YELLOW);
}

#[test]
fn impact_ring_expands_as_it_fades() {
    let mut pool = pool();
    pool.spawn_impact(Vec2::new(10.0, 10.0), Rgb::YELLOW);

    let radius = |pool: &EffectPool| match pool.iter().next() {
        Some(Effect::Impact(impact)) => impact.radius(),
        other => panic!("expected impact, found {other:?}"),
    };

    assert_eq!(radius(&pool), 0.0);
    for _ in 0..5 {
        let _ = pool.tick();
    }
    assert!((radius(&pool) - 10.0).abs() < 1e-4);

    let Some(Effect::Impact(impact)) = pool.iter().next() else {
        panic!("impact expired early");
    };
    assert_eq!(impact.stroke_width(), 2.0);
    assert_eq!(impact.color(), Rgb::YELLOW);
}

#[test]
fn expiring_neighbours_do_not_shield_survivors() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut pool = pool();
    for index in 0..6 {
        let position = Vec2::splat(index as f32);
        pool.spawn_impact(position, Rgb::WHITE);
        pool.spawn_trail(position, Rgb::WHITE, 15.0);
        pool.spawn_damage_number(position, 1, false, &mut rng);
    }
    assert_eq!(pool.len(), 18);

    let mut removed = 0;
    for _ in 0..10 {
        removed += pool.tick();
    }
    assert_eq!(removed, 6);
    assert!(pool.iter().all(|effect| !matches!(effect, Effect::Impact(_))));

    for _ in 10..30 {
        removed += pool.tick();
    }
    assert_eq!(removed, 12);
    assert!(pool
        .iter()
        .all(|effect| matches!(effect, Effect::DamageNumber(_))));

    for _ in 30..60 {
        removed += pool.tick();
    }
    assert_eq!(removed, 18);
    assert!(pool.is_empty());
}

#[test]
fn ambient_particles_wrap_and_never_expire() {
    let arena = Arena::default();
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut field = ParticleField::new(arena, 50, &mut rng);

    for particle in field.particles() {
        assert!((1..=3).contains(&particle.size()));
        assert!(particle.velocity().x.abs() <= 0.5 && particle.velocity().y.abs() <= 0.5);
    }

    for _ in 0..10_000 {
        field.tick();
    }

    assert_eq!(field.len(), 50);
    for particle in field.particles() {
        let position = particle.position();
        assert!(position.x >= -1.5 && position.x <= arena.width + 1.5, "{position:?}");
        assert!(position.y >= -1.5 && position.y <= arena.height + 1.5, "{position:?}");
        assert_eq!(particle.alpha(), OPAQUE);
    }
}

#[test]
fn particle_leaving_right_edge_reenters_on_the_left() {
    let arena = Arena::default();
    let particle = BackgroundParticle::new(Vec2::new(799.0, 300.0), Vec2::new(0.5, 0.0), 2);
    let mut field = ParticleField::from_particles(arena, vec![particle]);

    for _ in 0..5 {
        field.tick();
    }

    let position = field.particles()[0].position();
    assert!(position.x < 1.0, "particle stuck at {position:?}");
}

#[test]
fn messages_hold_then_fade_linearly() {
    let mut display = MessageDisplay::new(MessageTuning::default()).expect("valid tuning");
    display.add_message("Wave 1", Vec2::new(400.0, 300.0), Rgb::YELLOW, 48);

    for _ in 0..89 {
        display.update();
    }
    assert_eq!(display.messages()[0].alpha(), OPAQUE);
    assert_eq!(display.messages()[0].timer(), 1);

    display.update();
    assert_eq!(display.messages()[0].alpha(), 250);

    for _ in 0..49 {
        display.update();
    }
    assert_eq!(display.messages()[0].alpha(), 5);

    display.update();
    assert!(display.is_empty());
}

#[test]
fn simultaneous_message_expiry_removes_every_sibling() {
    let mut display = MessageDisplay::new(MessageTuning::default()).expect("valid tuning");
    for text in ["Nice!", "Great!", "Awesome!"] {
        display.add_message(text, Vec2::ZERO, Rgb::WHITE, 36);
    }
    for _ in 0..10 {
        display.update();
    }
    display.add_message("late", Vec2::ZERO, Rgb::WHITE, 36);

    for _ in 10..140 {
        display.update();
    }

    let remaining: Vec<&str> = display.messages().iter().map(|m| m.text()).collect();
    assert_eq!(remaining, vec!["late"]);
}

#[test]
fn screen_shake_is_idle_until_restarted() {
    let mut shake = ScreenShake::new(ShakeTuning::default()).expect("valid tuning");
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    assert!(!shake.is_shaking());
    assert_eq!(shake.shake(&mut rng), IVec2::ZERO);

    shake.restart();
    for _ in 0..20 {
        assert!(shake.is_shaking());
        let offset = shake.shake(&mut rng);
        assert!(offset.x.abs() <= 5 && offset.y.abs() <= 5, "{offset:?}");
    }
    assert!(!shake.is_shaking());
    assert_eq!(shake.shake(&mut rng), IVec2::ZERO);
}
