#![forbid(unsafe_code)]

//! Frame clock: converts frame timestamps into animation deltas.
//!
//! Animations in this workspace are advanced with explicit `Duration`
//! deltas so that they stay deterministic under test. Hosts that are driven
//! by a real display link feed timestamps into a [`FrameClock`] and pass the
//! resulting delta to `tick`.
//!
//! # Invariants
//!
//! 1. The first call to [`FrameClock::tick`] after construction or
//!    [`FrameClock::reset`] returns `Duration::ZERO`.
//! 2. Deltas never exceed `max_delta` (a stalled frame does not teleport an
//!    animation to its end).
//! 3. Timestamps that go backwards yield `Duration::ZERO`.

use std::time::Duration;

use web_time::Instant;

/// Default cap on a single frame delta (two frames at 30fps).
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(66);

/// Tracks the previous frame timestamp and produces capped deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock with the default delta cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: None,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Set the maximum delta returned per frame (builder pattern).
    #[must_use]
    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Maximum delta returned per frame.
    #[inline]
    #[must_use]
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }

    /// Record a frame at `now` and return the time since the previous one.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let delta = match self.last {
            Some(last) => now
                .checked_duration_since(last)
                .unwrap_or(Duration::ZERO)
                .min(self.max_delta),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        delta
    }

    /// Record a frame at the current time.
    pub fn tick_now(&mut self) -> Duration {
        self.tick(Instant::now())
    }

    /// Forget the previous timestamp (e.g. after the host was suspended).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn delta_between_frames() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        let dt = clock.tick(t0 + Duration::from_millis(16));
        assert_eq!(dt, Duration::from_millis(16));
    }

    #[test]
    fn stalled_frame_is_capped() {
        let mut clock = FrameClock::new().with_max_delta(Duration::from_millis(20));
        let t0 = Instant::now();
        clock.tick(t0);
        let dt = clock.tick(t0 + Duration::from_secs(3));
        assert_eq!(dt, Duration::from_millis(20));
    }

    #[test]
    fn backwards_timestamp_is_zero() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.tick(t0);
        assert_eq!(clock.tick(t0 - Duration::from_millis(500)), Duration::ZERO);
    }

    #[test]
    fn reset_forgets_last_frame() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        clock.reset();
        assert_eq!(clock.tick(t0 + Duration::from_millis(40)), Duration::ZERO);
    }
}
