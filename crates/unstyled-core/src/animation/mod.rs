#![forbid(unsafe_code)]

//! Animation primitives for component state machines.
//!
//! Two layers:
//!
//! - [`Animation`]: anything that advances with a `Duration` delta and
//!   reports completion plus a normalized `value()` in [0.0, 1.0].
//! - [`Motion`]: an [`Animation`] that moves a scalar position (pixels)
//!   toward a target and can report its instantaneous velocity. Settle
//!   engines drive motions and read `position()` every frame.
//!
//! A [`Motion`] is started from an [`AnimationSpec`], the cloneable
//! description held in component configuration. Built-in strategies are
//! tweens ([`Tween`]), springs ([`Spring`]) and an instant snap; hosts plug
//! in their own interpolation through [`MotionFactory`].
//!
//! # Invariants
//!
//! 1. A freshly started motion reports `position() == from` (interrupting
//!    one motion and starting another at its current position never jumps).
//! 2. A completed motion reports `position() == target()` exactly.
//! 3. `value()` is always within [0.0, 1.0].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub mod decay;
pub mod easing;
pub mod spring;
pub mod tween;

pub use decay::DecaySpec;
pub use easing::Easing;
pub use spring::Spring;
pub use tween::Tween;

/// A time-driven animation.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has finished.
    fn is_complete(&self) -> bool;

    /// Normalized progress in [0.0, 1.0].
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);
}

/// An animation of a scalar position toward a target.
pub trait Motion: Animation + fmt::Debug + Send {
    /// Current (unclamped) position.
    fn position(&self) -> f64;

    /// Current velocity in units per second.
    fn velocity(&self) -> f64;

    /// Position the motion is heading to.
    fn target(&self) -> f64;
}

/// Pluggable interpolation strategy.
///
/// Implement this to drive settles with an interpolator the built-in
/// [`AnimationSpec`] variants do not cover.
pub trait MotionFactory: fmt::Debug + Send + Sync {
    /// Start a motion from `from` to `to`, carrying `initial_velocity`
    /// (units per second) where the strategy supports it.
    fn start(&self, from: f64, to: f64, initial_velocity: f64) -> Box<dyn Motion>;
}

/// Default tween duration for programmatic transitions.
pub const DEFAULT_TWEEN_DURATION: Duration = Duration::from_millis(300);

/// Description of how to move between two positions.
#[derive(Debug, Clone)]
pub enum AnimationSpec {
    /// Fixed-duration interpolation with an easing curve.
    Tween {
        /// Total duration.
        duration: Duration,
        /// Easing applied to normalized time.
        easing: Easing,
    },
    /// Damped spring; carries the initial velocity.
    Spring {
        /// Restoring force strength.
        stiffness: f64,
        /// Velocity drag.
        damping: f64,
    },
    /// Jump straight to the target.
    Snap,
    /// Host-provided strategy.
    Custom(Arc<dyn MotionFactory>),
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::Tween {
            duration: DEFAULT_TWEEN_DURATION,
            easing: Easing::EaseInOut,
        }
    }
}

impl AnimationSpec {
    /// Tween with the given duration and easing.
    #[must_use]
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self::Tween { duration, easing }
    }

    /// Spring with the given parameters.
    #[must_use]
    pub fn spring(stiffness: f64, damping: f64) -> Self {
        Self::Spring { stiffness, damping }
    }

    /// Critically damped spring for the given stiffness.
    #[must_use]
    pub fn critically_damped(stiffness: f64) -> Self {
        let k = stiffness.max(spring::MIN_STIFFNESS);
        Self::Spring {
            stiffness: k,
            damping: 2.0 * k.sqrt(),
        }
    }

    /// Whether motions started from this spec complete without ticking.
    #[must_use]
    pub fn is_instant(&self) -> bool {
        match self {
            Self::Snap => true,
            Self::Tween { duration, .. } => duration.is_zero(),
            Self::Spring { .. } | Self::Custom(_) => false,
        }
    }

    /// Start a motion from `from` to `to`.
    #[must_use]
    pub fn start(&self, from: f64, to: f64, initial_velocity: f64) -> Box<dyn Motion> {
        match self {
            Self::Tween { duration, easing } => Box::new(Tween::new(from, to, *duration, *easing)),
            Self::Spring { stiffness, damping } => Box::new(
                Spring::new(from, to)
                    .with_stiffness(*stiffness)
                    .with_damping(*damping)
                    .with_initial_velocity(initial_velocity)
                    .with_rest_threshold(spring::PIXEL_REST_THRESHOLD)
                    .with_velocity_threshold(spring::PIXEL_VELOCITY_THRESHOLD),
            ),
            Self::Snap => Box::new(Tween::new(from, to, Duration::ZERO, Easing::Linear)),
            Self::Custom(factory) => factory.start(from, to, initial_velocity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn run_to_completion(motion: &mut dyn Motion, max_frames: usize) -> usize {
        for frame in 0..max_frames {
            if motion.is_complete() {
                return frame;
            }
            motion.tick(MS_16);
        }
        max_frames
    }

    #[test]
    fn every_builtin_starts_at_from() {
        let specs = [
            AnimationSpec::default(),
            AnimationSpec::spring(300.0, 30.0),
            AnimationSpec::critically_damped(200.0),
        ];
        for spec in specs {
            let motion = spec.start(12.0, 80.0, 0.0);
            assert!(
                (motion.position() - 12.0).abs() < f64::EPSILON,
                "{spec:?} started at {}",
                motion.position()
            );
        }
    }

    #[test]
    fn every_builtin_lands_exactly_on_target() {
        let specs = [
            AnimationSpec::default(),
            AnimationSpec::Snap,
            AnimationSpec::spring(300.0, 30.0),
            AnimationSpec::critically_damped(200.0),
        ];
        for spec in specs {
            let mut motion = spec.start(0.0, 240.0, 0.0);
            let frames = run_to_completion(motion.as_mut(), 1000);
            assert!(frames < 1000, "{spec:?} never completed");
            assert_eq!(motion.position(), 240.0, "{spec:?} did not snap to target");
        }
    }

    #[test]
    fn snap_is_instant() {
        assert!(AnimationSpec::Snap.is_instant());
        assert!(AnimationSpec::tween(Duration::ZERO, Easing::Linear).is_instant());
        assert!(!AnimationSpec::default().is_instant());
        let motion = AnimationSpec::Snap.start(0.0, 50.0, 0.0);
        assert!(motion.is_complete());
        assert_eq!(motion.position(), 50.0);
    }

    #[test]
    fn spring_spec_carries_velocity() {
        let motion = AnimationSpec::spring(200.0, 20.0).start(0.0, 100.0, -500.0);
        assert_eq!(motion.velocity(), -500.0);
    }

    #[derive(Debug)]
    struct Linear;

    impl MotionFactory for Linear {
        fn start(&self, from: f64, to: f64, _initial_velocity: f64) -> Box<dyn Motion> {
            Box::new(Tween::new(from, to, Duration::from_millis(32), Easing::Linear))
        }
    }

    #[test]
    fn custom_factory_is_used() {
        let spec = AnimationSpec::Custom(Arc::new(Linear));
        let mut motion = spec.start(0.0, 10.0, 0.0);
        motion.tick(MS_16);
        assert!((motion.position() - 5.0).abs() < 1e-9);
        motion.tick(MS_16);
        assert!(motion.is_complete());
    }
}
