#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) motion.
//!
//! Physically-based settling that carries momentum: a spring started with
//! the release velocity of a drag continues the gesture smoothly instead of
//! restarting from rest.
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force strength. Higher = faster response.
//! - **damping** (c): velocity drag. `c = 2√k` is critical damping (fastest
//!   convergence without overshoot).
//! - **rest thresholds**: the spring is at rest once both the distance to
//!   the target and the speed fall below their thresholds, at which point the
//!   position snaps to the target.
//!
//! # Integration
//!
//! Semi-implicit Euler, subdivided into steps of at most 4ms so that large
//! frame deltas stay stable with stiff springs. A single advance integrates
//! at most [`MAX_ADVANCE`]; a longer delta (a stalled host, a resumed tab)
//! snaps the spring to its target.
//!
//! # Invariants
//!
//! 1. A spring at rest reports `position() == target()` exactly.
//! 2. Stiffness is at least [`MIN_STIFFNESS`]; damping is non-negative.
//! 3. [`Spring::retarget`] keeps position and velocity (no discontinuity).

use std::time::Duration;

use super::{Animation, Motion};

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Longest delta integrated by one [`Spring::advance`] call.
pub const MAX_ADVANCE: Duration = Duration::from_secs(1);

/// Minimum stiffness to prevent degenerate springs.
pub const MIN_STIFFNESS: f64 = 0.1;

/// Rest threshold for springs measured in pixels.
pub const PIXEL_REST_THRESHOLD: f64 = 0.1;

/// Velocity threshold (pixels per second) for springs measured in pixels.
pub const PIXEL_VELOCITY_THRESHOLD: f64 = 1.0;

/// Default rest threshold for normalized springs.
const DEFAULT_REST_THRESHOLD: f64 = 0.001;

/// Default velocity threshold for normalized springs.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.01;

/// A damped spring moving a position toward a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    initial_velocity: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`.
    ///
    /// Default parameters: stiffness = 400.0, damping = 40.0 (critical).
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            initial_velocity: 0.0,
            stiffness: 400.0,
            damping: 40.0,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: false,
        }
    }

    /// Set stiffness (builder pattern). Clamped to [`MIN_STIFFNESS`].
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    /// Set damping (builder pattern). Clamped to minimum 0.0.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    /// Set the starting velocity (builder pattern).
    #[must_use]
    pub fn with_initial_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self.initial_velocity = velocity;
        self
    }

    /// Set rest threshold (builder pattern).
    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    /// Set velocity threshold (builder pattern).
    #[must_use]
    pub fn with_velocity_threshold(mut self, threshold: f64) -> Self {
        self.velocity_threshold = threshold.abs();
        self
    }

    /// Stiffness parameter.
    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Damping parameter.
    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Critical damping coefficient for the current stiffness.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.sqrt()
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Move the target, keeping the current position and velocity.
    pub fn retarget(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold || !self.at_rest {
            self.target = target;
            self.at_rest = false;
        }
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    fn settle_if_resting(&mut self) {
        let pos_delta = (self.position - self.target).abs();
        if pos_delta < self.rest_threshold && self.velocity.abs() < self.velocity_threshold {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }

    /// Advance the spring by `dt`, subdividing for stability.
    ///
    /// Deltas longer than [`MAX_ADVANCE`] complete the spring at its target.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        if dt > MAX_ADVANCE {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
            return;
        }
        let mut remaining = dt.as_secs_f64();
        if remaining <= 0.0 {
            // A spring created at its target with no velocity rests immediately.
            self.settle_if_resting();
            return;
        }
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        self.settle_if_resting();
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    /// Fraction of the initial distance covered, clamped to [0.0, 1.0].
    fn value(&self) -> f32 {
        let span = self.target - self.initial;
        if span.abs() < f64::EPSILON {
            return if self.at_rest { 1.0 } else { 0.0 };
        }
        (((self.position - self.initial) / span) as f32).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = self.initial_velocity;
        self.at_rest = false;
    }
}

impl Motion for Spring {
    fn position(&self) -> f64 {
        self.position
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }

    fn target(&self) -> f64 {
        self.target
    }
}
