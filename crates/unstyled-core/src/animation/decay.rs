#![forbid(unsafe_code)]

//! Exponential decay for fling projection.
//!
//! A released drag keeps moving with velocity `v(t) = v0 · e^(-friction·t)`.
//! Integrating to `t → ∞` gives the asymptotic resting point
//! `x0 + v0 / friction`, which velocity-driven settling compares against
//! the anchors to decide where a fling "wants" to stop.

/// Default friction (per second). Higher values stop flings sooner.
pub const DEFAULT_FRICTION: f64 = 4.2;

/// Minimum friction to keep projections finite.
const MIN_FRICTION: f64 = 0.01;

/// Exponential decay parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecaySpec {
    friction: f64,
}

impl Default for DecaySpec {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
        }
    }
}

impl DecaySpec {
    /// Create a decay with the given friction (clamped to a small positive minimum).
    #[must_use]
    pub fn new(friction: f64) -> Self {
        Self {
            friction: friction.max(MIN_FRICTION),
        }
    }

    /// Friction coefficient.
    #[inline]
    #[must_use]
    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// Asymptotic resting position of a fling.
    #[must_use]
    pub fn project(&self, initial_velocity: f64, initial_position: f64) -> f64 {
        if !initial_velocity.is_finite() {
            return initial_position;
        }
        initial_position + initial_velocity / self.friction
    }

    /// Position after `secs` seconds of decay.
    #[must_use]
    pub fn position_at(&self, initial_velocity: f64, initial_position: f64, secs: f64) -> f64 {
        let travelled = initial_velocity / self.friction * (1.0 - (-self.friction * secs).exp());
        initial_position + travelled
    }
}
