#![forbid(unsafe_code)]

//! Easing curves for tweens and transitions.

/// Easing function applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Decelerating curve; good for entrances.
    EaseOut,
    /// Accelerating curve; good for exits.
    EaseIn,
    /// Smooth S-curve; good for general transitions.
    #[default]
    EaseInOut,
    /// Slight overshoot then settle.
    Back,
}

impl Easing {
    /// Apply the easing function to `t` (clamped to [0.0, 1.0]).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseIn => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Self::Back => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let t_minus_1 = t - 1.0;
                1.0 + c3 * t_minus_1 * t_minus_1 * t_minus_1 + c1 * t_minus_1 * t_minus_1
            }
        }
    }

    /// Derivative of the curve at `t` (clamped to [0.0, 1.0]).
    ///
    /// Used to report the instantaneous velocity of a tween so a motion that
    /// interrupts it can carry the momentum over.
    #[must_use]
    pub fn slope(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => 1.0,
            Self::EaseOut => {
                let inv = 1.0 - t;
                3.0 * inv * inv
            }
            Self::EaseIn => 3.0 * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    12.0 * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    3.0 * inv * inv
                }
            }
            Self::Back => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let t_minus_1 = t - 1.0;
                3.0 * c3 * t_minus_1 * t_minus_1 + 2.0 * c1 * t_minus_1
            }
        }
    }

    /// Whether this easing can produce values outside [0.0, 1.0].
    #[must_use]
    pub fn can_overshoot(self) -> bool {
        matches!(self, Self::Back)
    }
}
