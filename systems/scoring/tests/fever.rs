use echo_defence_core::FeverTuning;
use echo_defence_system_scoring::FeverManager;

fn fever() -> FeverManager {
    FeverManager::new(FeverTuning::default()).expect("default tuning is valid")
}

#[test]
fn crossing_threshold_activates_within_the_same_call() {
    let mut fever = fever();
    for _ in 0..19 {
        assert!(!fever.add_charge(5.0));
    }
    assert!((fever.charge_percentage() - 95.0).abs() < 1e-4);

    assert!(fever.add_charge(5.0));
    assert!(fever.is_active());
    assert_eq!(fever.charge(), 0.0);
    assert_eq!(fever.remaining(), 300);
}

#[test]
fn overshooting_activates_once_and_discards_excess() {
    let mut fever = fever();
    assert!(!fever.add_charge(60.0));
    assert!(fever.add_charge(60.0));
    assert_eq!(fever.charge(), 0.0);
}

#[test]
fn charge_is_ignored_while_active() {
    let mut fever = fever();
    assert!(fever.add_charge(100.0));

    for _ in 0..10 {
        assert!(!fever.add_charge(50.0));
    }
    assert_eq!(fever.charge(), 0.0);
    assert!(fever.is_active());
}

#[test]
fn fever_ends_after_duration_and_charging_resumes() {
    let mut fever = fever();
    assert!(fever.add_charge(100.0));

    for _ in 0..299 {
        assert!(!fever.update());
    }
    assert!(fever.is_active());
    assert!(fever.update());
    assert!(!fever.is_active());
    assert!(!fever.update());

    assert!(!fever.add_charge(25.0));
    assert!((fever.charge_percentage() - 25.0).abs() < 1e-4);
}

#[test]
fn damage_multiplier_applies_only_while_active() {
    let mut fever = fever();
    assert_eq!(fever.damage_multiplier(), 1.0);
    assert!(fever.add_charge(100.0));
    assert_eq!(fever.damage_multiplier(), 2.0);
}

#[test]
fn non_positive_threshold_is_rejected() {
    let tuning = FeverTuning {
        threshold: -1.0,
        ..FeverTuning::default()
    };
    assert!(FeverManager::new(tuning).is_err());
}
