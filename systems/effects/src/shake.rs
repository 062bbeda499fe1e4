use echo_defence_core::{ShakeTuning, TuningError};
use glam::IVec2;
use rand::Rng;

/// Camera shake burst lasting a fixed number of sampled frames.
///
/// Starts idle; [`ScreenShake::restart`] arms a new burst.
#[derive(Debug)]
pub struct ScreenShake {
    intensity: i32,
    duration: u32,
    timer: u32,
}

impl ScreenShake {
    /// Creates an idle shake.
    pub fn new(tuning: ShakeTuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            intensity: tuning.intensity,
            duration: tuning.duration,
            timer: tuning.duration,
        })
    }

    /// Arms a new burst, replacing any burst in progress.
    pub fn restart(&mut self) {
        self.timer = 0;
    }

    /// Reports whether the next sample will be offset.
    #[must_use]
    pub fn is_shaking(&self) -> bool {
        self.timer < self.duration
    }

    /// Samples the offset for this frame, `(0, 0)` once the burst is spent.
    pub fn shake<R: Rng + ?Sized>(&mut self, rng: &mut R) -> IVec2 {
        if !self.is_shaking() {
            return IVec2::ZERO;
        }
        self.timer += 1;
        IVec2::new(
            rng.gen_range(-self.intensity..=self.intensity),
            rng.gen_range(-self.intensity..=self.intensity),
        )
    }
}
