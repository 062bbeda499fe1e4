#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scoring economy: decaying hit combos and the charge-gated fever burst.

use echo_defence_core::{ComboTuning, FeverTuning, TuningError};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

const MILESTONES: [(u32, &str); 7] = [
    (5, "Nice!"),
    (10, "Great!"),
    (15, "Awesome!"),
    (20, "Amazing!"),
    (30, "Incredible!"),
    (50, "Unstoppable!"),
    (100, "GODLIKE!"),
];

/// Hit-streak accumulator with a decay timer.
///
/// Every hit refreshes the timer to the decay window. The streak resets on the
/// tick the timer falls from one to zero; an already expired timer never
/// resets anything.
#[derive(Debug)]
pub struct ComboManager {
    tuning: ComboTuning,
    count: u32,
    timer: u32,
}

impl ComboManager {
    /// Creates an empty streak, rejecting a zero decay window.
    pub fn new(tuning: ComboTuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            count: 0,
            timer: 0,
        })
    }

    /// Registers a successful hit.
    pub fn add_hit(&mut self) {
        self.count = self.count.saturating_add(1);
        self.timer = self.tuning.decay_window;
    }

    /// Ages the decay timer by one tick.
    ///
    /// Returns the length of the streak that expired on this tick, if any.
    pub fn update(&mut self) -> Option<u32> {
        if self.timer == 0 {
            return None;
        }
        self.timer -= 1;
        if self.timer > 0 {
            return None;
        }
        let broken = std::mem::take(&mut self.count);
        (broken > 0).then_some(broken)
    }

    /// Current streak length.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Reports whether a streak is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.timer > 0
    }

    /// Ticks left before the streak expires.
    #[must_use]
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Bonus points granted on top of a defeated enemy's base value.
    #[must_use]
    pub fn bonus(&self) -> u64 {
        (f64::from(self.count) * self.tuning.bonus_multiplier).floor() as u64
    }

    /// Random flavour text while at least two hits are chained, empty otherwise.
    ///
    /// Draws from `rng`, so callers that need a reproducible simulation should
    /// pass a generator reserved for presentation.
    #[must_use]
    pub fn combo_message<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        if self.count <= 1 {
            return "";
        }
        self.tuning
            .messages
            .choose(rng)
            .map_or("", String::as_str)
    }

    /// Banner text when the streak lands exactly on a milestone length.
    #[must_use]
    pub fn milestone_message(&self) -> Option<&'static str> {
        MILESTONES
            .iter()
            .find(|(length, _)| *length == self.count)
            .map(|(_, text)| *text)
    }

    /// Fever charge earned by a hit, boosted once the streak is long enough.
    #[must_use]
    pub fn fever_charge_for_hit(&self, base: f32) -> f32 {
        if self.count >= self.tuning.fever_boost_at {
            base + self.tuning.fever_boost
        } else {
            base
        }
    }
}

/// Charge-and-release burst state machine.
#[derive(Debug)]
pub struct FeverManager {
    tuning: FeverTuning,
    charge: f32,
    active: bool,
    timer: u32,
}

impl FeverManager {
    /// Creates an uncharged, inactive fever meter.
    pub fn new(tuning: FeverTuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            charge: 0.0,
            active: false,
            timer: 0,
        })
    }

    /// Adds charge while inactive, activating immediately on reaching the threshold.
    ///
    /// Non-positive amounts are ignored. Returns whether this call activated fever.
    pub fn add_charge(&mut self, amount: f32) -> bool {
        if self.active || amount.is_nan() || amount <= 0.0 {
            return false;
        }
        self.charge += amount;
        if self.charge < self.tuning.threshold {
            return false;
        }
        self.active = true;
        self.timer = self.tuning.duration;
        self.charge = 0.0;
        debug!(duration = self.timer, "fever activated");
        true
    }

    /// Ages the fever timer by one tick. Returns whether fever ended on this tick.
    pub fn update(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.timer = self.timer.saturating_sub(1);
        if self.timer > 0 {
            return false;
        }
        self.active = false;
        debug!("fever ended");
        true
    }

    /// Fill level of the meter in percent. Only meaningful while inactive.
    #[must_use]
    pub fn charge_percentage(&self) -> f32 {
        100.0 * self.charge / self.tuning.threshold
    }

    /// Reports whether fever is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ticks of fever remaining.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.timer
    }

    /// Accumulated charge.
    #[must_use]
    pub fn charge(&self) -> f32 {
        self.charge
    }

    /// Charge granted per successful hit before combo boosts.
    #[must_use]
    pub fn charge_per_hit(&self) -> f32 {
        self.tuning.charge_per_hit
    }

    /// Damage multiplier in effect for the current tick.
    #[must_use]
    pub fn damage_multiplier(&self) -> f32 {
        if self.active {
            self.tuning.damage_multiplier
        } else {
            1.0
        }
    }
}
