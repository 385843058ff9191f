#![forbid(unsafe_code)]

//! Drag coordination: per-frame deltas to a clamped sheet offset.
//!
//! Deltas are applied in arrival order to the sheet's raw offset (positive
//! deltas move the sheet down, toward closed). The track is bounded by the
//! outermost anchors and clamped hard: there is no rubber banding. Motion
//! pushed past a bound is kept as *unconsumed* distance, and a reversal pays
//! it back before the sheet moves again, so the sheet resumes exactly where
//! the finger re-enters the track.
//!
//! The coordinator never decides a destination. On release the sheet hands
//! the final offset and velocity to the settle logic.

/// Tracks an in-progress drag.
#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    active: bool,
    start_offset: f64,
    unconsumed: f64,
    travelled: f64,
}

impl DragCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a drag at `offset`.
    pub fn start(&mut self, offset: f64) {
        self.active = true;
        self.start_offset = offset;
        self.unconsumed = 0.0;
        self.travelled = 0.0;
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Offset at which the current drag began.
    #[inline]
    #[must_use]
    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    /// Distance pushed beyond a track bound and not yet paid back.
    ///
    /// Negative when pushed past the top bound, positive past the bottom.
    #[inline]
    #[must_use]
    pub fn unconsumed(&self) -> f64 {
        self.unconsumed
    }

    /// Sum of absolute deltas received during this drag.
    #[inline]
    #[must_use]
    pub fn travelled(&self) -> f64 {
        self.travelled
    }

    /// Apply `delta` to `offset` within `[min, max]` and return the new offset.
    pub fn apply(&mut self, offset: f64, delta: f64, min: f64, max: f64) -> f64 {
        if !delta.is_finite() {
            return offset;
        }
        self.travelled += delta.abs();
        let desired = offset + self.unconsumed + delta;
        let clamped = desired.clamp(min, max);
        self.unconsumed = desired - clamped;
        clamped
    }

    /// Finish the drag.
    pub fn end(&mut self) {
        self.active = false;
        self.unconsumed = 0.0;
    }
}
