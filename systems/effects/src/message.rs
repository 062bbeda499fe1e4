use echo_defence_core::{MessageTuning, Rgb, TuningError, OPAQUE};
use glam::Vec2;
use tracing::trace;

/// Text floating over the arena until it fades out.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingMessage {
    text: String,
    position: Vec2,
    color: Rgb,
    font_size: u32,
    timer: u32,
    alpha: u8,
}

impl FloatingMessage {
    /// Displayed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Anchor of the text.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Text color.
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Font size.
    #[must_use]
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Ticks left in the hold phase.
    #[must_use]
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Current opacity.
    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    fn tick(&mut self, fade_per_tick: u8) -> bool {
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.alpha = self.alpha.saturating_sub(fade_per_tick);
        }
        self.alpha > 0
    }
}

/// Floating messages with a hold phase at full opacity followed by a linear fade.
#[derive(Debug)]
pub struct MessageDisplay {
    tuning: MessageTuning,
    messages: Vec<FloatingMessage>,
}

impl MessageDisplay {
    /// Creates an empty display, rejecting a zero fade step.
    pub fn new(tuning: MessageTuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            messages: Vec::new(),
        })
    }

    /// Posts a message at full opacity.
    pub fn add_message(
        &mut self,
        text: impl Into<String>,
        position: Vec2,
        color: Rgb,
        font_size: u32,
    ) {
        let text = text.into();
        trace!(%text, "message posted");
        self.messages.push(FloatingMessage {
            text,
            position,
            color,
            font_size,
            timer: self.tuning.hold_ticks,
            alpha: OPAQUE,
        });
    }

    /// Ages every message by one tick, dropping fully faded ones in place.
    pub fn update(&mut self) {
        let fade = self.tuning.fade_per_tick;
        self.messages.retain_mut(|message| message.tick(fade));
    }

    /// Visible messages in posting order.
    #[must_use]
    pub fn messages(&self) -> &[FloatingMessage] {
        &self.messages
    }

    /// Number of visible messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Reports whether no message is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
