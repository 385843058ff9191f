#![forbid(unsafe_code)]

//! Fixed-duration interpolation between two positions.
//!
//! # Invariants
//!
//! 1. `position()` equals `from` before the first tick and `to` exactly once
//!    complete.
//! 2. Elapsed time never exceeds the duration.
//! 3. A zero-duration tween is complete on construction.

use std::time::Duration;

use super::{Animation, Easing, Motion};

/// Eased interpolation from `from` to `to` over a fixed duration.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    /// Create a tween.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Start position.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> f64 {
        self.from
    }

    /// Total duration.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time elapsed so far.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Linear time fraction in [0.0, 1.0].
    fn time_fraction(&self) -> f64 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        }
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        self.time_fraction() as f32
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

impl Motion for Tween {
    fn position(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        if self.elapsed.is_zero() {
            return self.from;
        }
        let eased = self.easing.apply(self.time_fraction());
        self.from + (self.to - self.from) * eased
    }

    fn velocity(&self) -> f64 {
        if self.is_complete() {
            return 0.0;
        }
        let secs = self.duration.as_secs_f64();
        (self.to - self.from) * self.easing.slope(self.time_fraction()) / secs
    }

    fn target(&self) -> f64 {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);

    #[test]
    fn starts_at_from() {
        let tween = Tween::new(10.0, 90.0, Duration::from_millis(200), Easing::EaseOut);
        assert_eq!(tween.position(), 10.0);
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn linear_midpoint() {
        let mut tween = Tween::new(0.0, 100.0, Duration::from_millis(100), Easing::Linear);
        tween.tick(MS_50);
        assert!((tween.position() - 50.0).abs() < 1e-9);
        assert!((tween.velocity() - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn overshooting_tick_completes_exactly() {
        let mut tween = Tween::new(0.0, 100.0, Duration::from_millis(100), Easing::EaseInOut);
        tween.tick(Duration::from_secs(1));
        assert!(tween.is_complete());
        assert_eq!(tween.elapsed(), tween.duration());
        assert_eq!(tween.position(), 100.0);
        assert_eq!(tween.velocity(), 0.0);
    }

    #[test]
    fn max_tick_saturates() {
        let mut tween = Tween::new(0.0, 100.0, Duration::from_millis(100), Easing::Linear);
        tween.tick(Duration::from_millis(16));
        tween.tick(Duration::MAX);
        assert!(tween.is_complete());
        assert_eq!(tween.position(), 100.0);
    }

    #[test]
    fn zero_duration_is_complete() {
        let tween = Tween::new(3.0, 7.0, Duration::ZERO, Easing::Linear);
        assert!(tween.is_complete());
        assert_eq!(tween.position(), 7.0);
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn reverse_direction() {
        let mut tween = Tween::new(100.0, 0.0, Duration::from_millis(100), Easing::Linear);
        tween.tick(MS_50);
        assert!((tween.position() - 50.0).abs() < 1e-9);
        assert!(tween.velocity() < 0.0);
    }

    #[test]
    fn reset_restarts() {
        let mut tween = Tween::new(0.0, 1.0, Duration::from_millis(100), Easing::Linear);
        tween.tick(Duration::from_millis(500));
        tween.reset();
        assert!(!tween.is_complete());
        assert_eq!(tween.position(), 0.0);
    }
}
