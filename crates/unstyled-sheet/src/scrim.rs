#![forbid(unsafe_code)]

//! Scrim fade transition for modal sheets.
//!
//! The scrim is the dimming layer behind a modal sheet. It fades in while
//! the sheet enters and fades out while the sheet leaves; the modal surface
//! stays mounted until both the sheet and the scrim have finished exiting.
//!
//! # Invariants
//!
//! - Progress is always in [0.0, 1.0]
//! - Opacity is always in [0.0, `max_opacity`]
//! - Reversing mid-fade inverts progress instead of restarting
//!
//! # Failure Modes
//!
//! - Zero-duration fades complete on the next tick
//! - A non-finite `max_opacity` is treated as the default

use std::time::Duration;

use unstyled_core::animation::Easing;

// ============================================================================
// Phase
// ============================================================================

/// Lifecycle of the scrim.
///
/// State machine: Hidden → Entering → Visible → Exiting → Hidden.
/// Reversals jump directly between Entering and Exiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrimPhase {
    /// Fully transparent; nothing to render.
    #[default]
    Hidden,
    /// Fading in.
    Entering,
    /// At full opacity.
    Visible,
    /// Fading out.
    Exiting,
}

impl ScrimPhase {
    /// Whether the scrim should be rendered.
    #[inline]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Whether a fade is in progress.
    #[inline]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Entering | Self::Exiting)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Default scrim opacity at rest.
pub const DEFAULT_MAX_OPACITY: f64 = 0.32;

/// Scrim fade configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrimConfig {
    /// Fade-in duration.
    pub enter_duration: Duration,
    /// Fade-out duration.
    pub exit_duration: Duration,
    /// Easing for fade-in.
    pub enter_easing: Easing,
    /// Easing for fade-out.
    pub exit_easing: Easing,
    /// Opacity when fully visible.
    pub max_opacity: f64,
    /// Whether a reduced-motion preference disables the fade.
    pub respect_reduced_motion: bool,
}

impl Default for ScrimConfig {
    fn default() -> Self {
        Self {
            enter_duration: Duration::from_millis(200),
            exit_duration: Duration::from_millis(150),
            enter_easing: Easing::EaseOut,
            exit_easing: Easing::EaseIn,
            max_opacity: DEFAULT_MAX_OPACITY,
            respect_reduced_motion: true,
        }
    }
}

impl ScrimConfig {
    /// A configuration that shows and hides instantly.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            enter_duration: Duration::ZERO,
            exit_duration: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Set the fade-in duration.
    #[must_use]
    pub fn enter_duration(mut self, duration: Duration) -> Self {
        self.enter_duration = duration;
        self
    }

    /// Set the fade-out duration.
    #[must_use]
    pub fn exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }

    /// Set the fade-in easing.
    #[must_use]
    pub fn enter_easing(mut self, easing: Easing) -> Self {
        self.enter_easing = easing;
        self
    }

    /// Set the fade-out easing.
    #[must_use]
    pub fn exit_easing(mut self, easing: Easing) -> Self {
        self.exit_easing = easing;
        self
    }

    /// Set the resting opacity (clamped to [0, 1]).
    #[must_use]
    pub fn max_opacity(mut self, opacity: f64) -> Self {
        self.max_opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            DEFAULT_MAX_OPACITY
        };
        self
    }

    /// Set whether reduced motion disables the fade.
    #[must_use]
    pub fn respect_reduced_motion(mut self, respect: bool) -> Self {
        self.respect_reduced_motion = respect;
        self
    }

    /// The configuration actually used under the given motion preference.
    #[must_use]
    pub fn effective(&self, reduced_motion: bool) -> Self {
        if reduced_motion && self.respect_reduced_motion {
            Self {
                max_opacity: self.max_opacity,
                ..Self::instant()
            }
        } else {
            self.clone()
        }
    }
}

// ============================================================================
// Transition State
// ============================================================================

/// Progress of the scrim fade.
#[derive(Debug, Clone, Default)]
pub struct ScrimTransition {
    phase: ScrimPhase,
    /// Progress within the current fade (0.0 to 1.0).
    progress: f64,
    reduced_motion: bool,
}

impl ScrimTransition {
    /// A hidden scrim.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> ScrimPhase {
        self.phase
    }

    /// Raw progress within the current fade.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether the scrim has fully faded out.
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.phase == ScrimPhase::Hidden
    }

    /// Whether the scrim is at full opacity.
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase == ScrimPhase::Visible
    }

    /// Whether no fade is in progress.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.phase.is_animating()
    }

    /// Set the reduced-motion preference.
    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
    }

    /// Begin fading in. Reverses an in-progress fade-out.
    pub fn start_entering(&mut self) {
        match self.phase {
            ScrimPhase::Hidden => {
                self.phase = ScrimPhase::Entering;
                self.progress = 0.0;
            }
            ScrimPhase::Exiting => {
                // 30% through exiting is 70% entered.
                self.phase = ScrimPhase::Entering;
                self.progress = 1.0 - self.progress;
            }
            ScrimPhase::Entering | ScrimPhase::Visible => {}
        }
    }

    /// Begin fading out. Reverses an in-progress fade-in.
    pub fn start_exiting(&mut self) {
        match self.phase {
            ScrimPhase::Visible => {
                self.phase = ScrimPhase::Exiting;
                self.progress = 0.0;
            }
            ScrimPhase::Entering => {
                self.phase = ScrimPhase::Exiting;
                self.progress = 1.0 - self.progress;
            }
            ScrimPhase::Exiting | ScrimPhase::Hidden => {}
        }
    }

    /// Jump to full opacity.
    pub fn force_visible(&mut self) {
        self.phase = ScrimPhase::Visible;
        self.progress = 1.0;
    }

    /// Jump to fully transparent.
    pub fn force_hidden(&mut self) {
        self.phase = ScrimPhase::Hidden;
        self.progress = 0.0;
    }

    /// Advance by `delta`. Returns `true` if the phase changed.
    pub fn tick(&mut self, delta: Duration, config: &ScrimConfig) -> bool {
        let config = config.effective(self.reduced_motion);
        let (duration, done) = match self.phase {
            ScrimPhase::Entering => (config.enter_duration, ScrimPhase::Visible),
            ScrimPhase::Exiting => (config.exit_duration, ScrimPhase::Hidden),
            ScrimPhase::Hidden | ScrimPhase::Visible => return false,
        };
        let secs = duration.as_secs_f64();
        if secs > 0.0 {
            self.progress = (self.progress + delta.as_secs_f64() / secs).min(1.0);
        } else {
            self.progress = 1.0;
        }
        if self.progress < 1.0 {
            return false;
        }
        match done {
            ScrimPhase::Visible => self.force_visible(),
            _ => self.force_hidden(),
        }
        true
    }

    /// Eased visibility in [0.0, 1.0]: 0 transparent, 1 fully shown.
    #[must_use]
    pub fn eased(&self, config: &ScrimConfig) -> f64 {
        let config = config.effective(self.reduced_motion);
        let value = match self.phase {
            ScrimPhase::Entering => config.enter_easing.apply(self.progress),
            ScrimPhase::Exiting => 1.0 - config.exit_easing.apply(self.progress),
            ScrimPhase::Visible => 1.0,
            ScrimPhase::Hidden => 0.0,
        };
        value.clamp(0.0, 1.0)
    }

    /// Opacity to render the scrim with.
    #[must_use]
    pub fn opacity(&self, config: &ScrimConfig) -> f64 {
        let max = if config.max_opacity.is_finite() {
            config.max_opacity.clamp(0.0, 1.0)
        } else {
            DEFAULT_MAX_OPACITY
        };
        self.eased(config) * max
    }
}
