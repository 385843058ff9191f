#![forbid(unsafe_code)]

//! Settling: choosing a resting detent and animating toward it.
//!
//! Two entry points feed the same engine:
//!
//! - **Velocity-driven** (drag release): [`select_target`] projects where a
//!   fling would stop and picks a detent from the release position, the
//!   release velocity, and the thresholds in [`SettleConfig`].
//! - **Explicit** (programmatic): the caller names the detent.
//!
//! Either way [`SettleEngine`] drives one [`Motion`] from the current
//! position to the chosen anchor. Starting a settle while another runs
//! supersedes the old one: its ticket resolves as superseded and the new
//! motion starts from the old one's position and velocity.
//!
//! # Target selection
//!
//! With `|velocity| > velocity_threshold` the sheet moves to the next
//! anchor in the direction of travel. If the projected stop passes that
//! anchor, the in-direction anchor closest to the projection wins instead.
//!
//! Slower releases look at the anchors bracketing the release position. When
//! the current detent is one of them, the sheet leaves it only if it was
//! dragged at least the positional threshold toward the other one. Otherwise
//! the closer of the two wins.

use std::time::Duration;

use unstyled_core::animation::{AnimationSpec, DecaySpec, Motion};

use crate::anchors::AnchorMap;
use crate::detent::Detent;
use crate::error::SheetError;
use crate::ticket::{SettleOutcome, TicketResolver};

/// Default release speed (units per second) above which a release counts
/// as a fling.
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 125.0;

/// Default distance a slow release must cover to leave the current detent.
pub const DEFAULT_POSITIONAL_THRESHOLD: f64 = 56.0;

/// Default distance at which a settle counts as arrived.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// Speed below which a motion within tolerance of its target is at rest.
const REST_VELOCITY: f64 = 1.0;

/// How far a slow release must travel before the sheet changes detent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionalThreshold {
    /// Fraction of the gap between the two neighboring anchors.
    Fraction(f64),
    /// Fixed distance, capped at the gap.
    Fixed(f64),
}

impl PositionalThreshold {
    /// Threshold distance for a gap of `gap` units.
    #[must_use]
    pub fn distance(self, gap: f64) -> f64 {
        let gap = gap.abs();
        match self {
            Self::Fraction(f) => gap * f.clamp(0.0, 1.0),
            Self::Fixed(d) => d.max(0.0).min(gap),
        }
    }
}

impl Default for PositionalThreshold {
    fn default() -> Self {
        Self::Fixed(DEFAULT_POSITIONAL_THRESHOLD)
    }
}

/// Tunable settle parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleConfig {
    /// Distance a slow release must cover to leave the current detent.
    pub positional_threshold: PositionalThreshold,
    /// Release speed (units per second) a fling must exceed. A release at
    /// exactly this speed is treated as slow.
    pub velocity_threshold: f64,
    /// Fling projection.
    pub decay: DecaySpec,
    /// Distance at which a settle counts as arrived.
    pub tolerance: f64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            positional_threshold: PositionalThreshold::default(),
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            decay: DecaySpec::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SettleConfig {
    /// Set the positional threshold.
    #[must_use]
    pub fn positional_threshold(mut self, threshold: PositionalThreshold) -> Self {
        self.positional_threshold = threshold;
        self
    }

    /// Set the velocity threshold (clamped to be non-negative).
    #[must_use]
    pub fn velocity_threshold(mut self, threshold: f64) -> Self {
        self.velocity_threshold = if threshold.is_finite() {
            threshold.max(0.0)
        } else {
            DEFAULT_VELOCITY_THRESHOLD
        };
        self
    }

    /// Set the fling projection.
    #[must_use]
    pub fn decay(mut self, decay: DecaySpec) -> Self {
        self.decay = decay;
        self
    }

    /// Set the arrival tolerance (clamped to be non-negative).
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = if tolerance.is_finite() {
            tolerance.max(0.0)
        } else {
            DEFAULT_TOLERANCE
        };
        self
    }
}

/// What started a settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettleKind {
    /// Drag release or drag cancel.
    Velocity,
    /// Programmatic request.
    Explicit,
}

/// Pick the detent a release at `position` with `velocity` should settle to.
///
/// Positive velocity moves toward larger offsets (closing). Falls back to
/// `current` if `position` is not finite.
#[must_use]
pub fn select_target(
    anchors: &AnchorMap,
    current: &Detent,
    position: f64,
    velocity: f64,
    config: &SettleConfig,
) -> Detent {
    if !position.is_finite() {
        return current.clone();
    }
    let position = anchors.clamp(position);
    let velocity = if velocity.is_finite() { velocity } else { 0.0 };

    if velocity.abs() > config.velocity_threshold {
        return fling_target(anchors, position, velocity, config)
            .unwrap_or_else(|| current.clone());
    }

    if let Some(resting) = anchors
        .closest(position)
        .filter(|d| anchors.is_at(d, position, config.tolerance))
    {
        return resting.clone();
    }

    let (Some((up, up_offset)), Some((down, down_offset))) =
        (anchors.above(position), anchors.below(position))
    else {
        // On an anchor or at a track bound.
        return anchors.closest(position).unwrap_or(current).clone();
    };
    let gap = down_offset - up_offset;
    let threshold = config.positional_threshold.distance(gap);

    if up == current {
        return if position - up_offset >= threshold {
            down.clone()
        } else {
            up.clone()
        };
    }
    if down == current {
        return if down_offset - position >= threshold {
            up.clone()
        } else {
            down.clone()
        };
    }
    if position - up_offset <= down_offset - position {
        up.clone()
    } else {
        down.clone()
    }
}

fn fling_target(
    anchors: &AnchorMap,
    position: f64,
    velocity: f64,
    config: &SettleConfig,
) -> Option<Detent> {
    let projected = anchors.clamp(config.decay.project(velocity, position));
    let closing = velocity > 0.0;
    let next = if closing {
        anchors.below(position)
    } else {
        anchors.above(position)
    };
    let Some((next, next_offset)) = next else {
        return anchors.closest(position).cloned();
    };
    let passes = if closing {
        projected > next_offset
    } else {
        projected < next_offset
    };
    if !passes {
        return Some(next.clone());
    }
    anchors
        .iter()
        .filter(|&(_, offset)| {
            if closing {
                offset > position
            } else {
                offset < position
            }
        })
        .min_by(|a, b| (a.1 - projected).abs().total_cmp(&(b.1 - projected).abs()))
        .map(|(detent, _)| detent.clone())
}

/// Result of advancing the engine by one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SettleStep {
    /// No settle in flight.
    Idle,
    /// Still moving.
    Moving {
        /// New raw offset.
        position: f64,
        /// Current velocity.
        velocity: f64,
    },
    /// Arrived; `position` is the exact anchor offset.
    Finished {
        /// Detent reached.
        target: Detent,
        /// Anchor offset of `target`.
        position: f64,
    },
}

struct InFlight {
    motion: Box<dyn Motion>,
    target: Detent,
    target_offset: f64,
    kind: SettleKind,
    resolver: Option<TicketResolver>,
}

/// Drives at most one settle motion at a time.
#[derive(Default)]
pub struct SettleEngine {
    in_flight: Option<InFlight>,
}

impl std::fmt::Debug for SettleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("SettleEngine");
        if let Some(flight) = &self.in_flight {
            s.field("target", &flight.target)
                .field("kind", &flight.kind)
                .field("position", &flight.motion.position());
        }
        s.finish()
    }
}

impl SettleEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a settle is in flight.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Kind of the in-flight settle.
    #[must_use]
    pub fn kind(&self) -> Option<SettleKind> {
        self.in_flight.as_ref().map(|f| f.kind)
    }

    /// Target of the in-flight settle.
    #[must_use]
    pub fn target(&self) -> Option<&Detent> {
        self.in_flight.as_ref().map(|f| &f.target)
    }

    /// Current position and velocity of the in-flight motion.
    #[must_use]
    pub fn state(&self) -> Option<(f64, f64)> {
        self.in_flight
            .as_ref()
            .map(|f| (f.motion.position(), f.motion.velocity()))
    }

    /// Start a settle from `from` toward `target`'s anchor.
    ///
    /// Supersedes any in-flight settle. Fails with
    /// [`SheetError::DetentNotInAnchors`] if `target` has no anchor, in which
    /// case the in-flight settle is left untouched.
    pub fn settle_to(
        &mut self,
        anchors: &AnchorMap,
        spec: &AnimationSpec,
        from: f64,
        velocity: f64,
        target: &Detent,
        kind: SettleKind,
        resolver: Option<TicketResolver>,
    ) -> Result<(), SheetError> {
        let target_offset =
            anchors
                .offset_of(target)
                .ok_or_else(|| SheetError::DetentNotInAnchors {
                    id: target.id().to_owned(),
                })?;
        self.in_flight = Some(InFlight {
            motion: spec.start(from, target_offset, velocity),
            target: target.clone(),
            target_offset,
            kind,
            resolver,
        });
        Ok(())
    }

    /// Restart the in-flight motion from `from` toward a moved anchor.
    ///
    /// Velocity carries over. No-op when idle or when neither the start nor
    /// the anchor moved.
    pub fn retarget(&mut self, spec: &AnimationSpec, from: f64, target_offset: f64) {
        let Some(flight) = self.in_flight.as_mut() else {
            return;
        };
        if flight.target_offset == target_offset && flight.motion.position() == from {
            return;
        }
        let velocity = flight.motion.velocity();
        flight.motion = spec.start(from, target_offset, velocity);
        flight.target_offset = target_offset;
    }

    /// Stop the in-flight settle, resolving its ticket as superseded.
    ///
    /// Returns the position and velocity at the moment of cancellation.
    pub fn cancel(&mut self) -> Option<(f64, f64)> {
        let flight = self.in_flight.take()?;
        if let Some(resolver) = flight.resolver {
            resolver.resolve(SettleOutcome::Superseded);
        }
        Some((flight.motion.position(), flight.motion.velocity()))
    }

    /// Advance the motion by `dt`.
    ///
    /// A motion that completes, or comes to rest within `tolerance` of its
    /// anchor, finishes: the ticket resolves as reached and the returned
    /// position is the exact anchor offset.
    pub fn advance(&mut self, dt: Duration, tolerance: f64) -> SettleStep {
        let Some(flight) = self.in_flight.as_mut() else {
            return SettleStep::Idle;
        };
        flight.motion.tick(dt);
        let position = flight.motion.position();
        let velocity = flight.motion.velocity();
        let arrived = flight.motion.is_complete()
            || ((position - flight.target_offset).abs() <= tolerance
                && velocity.abs() <= REST_VELOCITY);
        if !arrived {
            return SettleStep::Moving { position, velocity };
        }
        let Some(flight) = self.in_flight.take() else {
            return SettleStep::Idle;
        };
        if let Some(resolver) = flight.resolver {
            resolver.resolve(SettleOutcome::Reached(flight.target.clone()));
        }
        SettleStep::Finished {
            target: flight.target,
            position: flight.target_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detent::DetentSet;
    use crate::ticket::SettleTicket;
    use unstyled_core::animation::Easing;

    const MS_16: Duration = Duration::from_millis(16);

    fn peek() -> Detent {
        Detent::fraction_of_container("peek", 0.6)
    }

    fn map() -> AnchorMap {
        // hidden 100, peek 40, full 0
        let set = DetentSet::new([Detent::hidden(), peek(), Detent::fully_expanded()]).unwrap();
        AnchorMap::rebuild(&set, 100.0, 100.0).unwrap()
    }

    fn select(current: &Detent, position: f64, velocity: f64) -> String {
        select_target(&map(), current, position, velocity, &SettleConfig::default())
            .id()
            .to_owned()
    }

    #[test]
    fn fling_up_skips_nearer_anchor() {
        // Closer to peek (40) than full (0) but flung upward.
        assert_eq!(select(&peek(), 30.0, -2000.0), Detent::FULLY_EXPANDED);
    }

    #[test]
    fn fling_takes_next_anchor_in_direction() {
        // Projection 70 - 130/4.2 ≈ 39 passes peek only barely; closest in-direction is peek.
        assert_eq!(select(&Detent::hidden(), 70.0, -130.0), "peek");
        // Downward fling from peek goes to hidden.
        assert_eq!(select(&peek(), 45.0, 300.0), Detent::HIDDEN);
    }

    #[test]
    fn fling_must_exceed_velocity_threshold() {
        // Release 10 above hidden: slow keeps hidden, anything faster flings to peek.
        assert_eq!(select(&Detent::hidden(), 90.0, -DEFAULT_VELOCITY_THRESHOLD), Detent::HIDDEN);
        assert_eq!(select(&Detent::hidden(), 90.0, -126.0), "peek");
    }

    #[test]
    fn fling_past_last_anchor_stays_at_bound() {
        assert_eq!(
            select(&Detent::fully_expanded(), 0.0, -5000.0),
            Detent::FULLY_EXPANDED
        );
    }

    #[test]
    fn slow_release_needs_positional_threshold_to_leave() {
        // From peek (40) dragged 30 toward hidden: under the 56 threshold.
        assert_eq!(select(&peek(), 70.0, 0.0), "peek");
        // Dragged 57: over threshold.
        assert_eq!(select(&peek(), 97.0, 0.0), Detent::HIDDEN);
    }

    #[test]
    fn slow_release_fraction_threshold() {
        let config =
            SettleConfig::default().positional_threshold(PositionalThreshold::Fraction(0.25));
        let target = select_target(&map(), &peek(), 60.0, 0.0, &config);
        // Gap 60, threshold 15, travelled 20.
        assert_eq!(target.id(), Detent::HIDDEN);
    }

    #[test]
    fn slow_release_unrelated_pair_picks_nearest() {
        // Current is hidden; bracket is full (0) / peek (40).
        assert_eq!(select(&Detent::hidden(), 15.0, 10.0), Detent::FULLY_EXPANDED);
        assert_eq!(select(&Detent::hidden(), 25.0, 10.0), "peek");
    }

    #[test]
    fn release_on_anchor_stays() {
        assert_eq!(select(&Detent::hidden(), 40.0, 0.0), "peek");
    }

    #[test]
    fn non_finite_position_keeps_current() {
        assert_eq!(select(&peek(), f64::NAN, 0.0), "peek");
    }

    #[test]
    fn threshold_distance_caps_at_gap() {
        assert_eq!(PositionalThreshold::Fixed(100.0).distance(40.0), 40.0);
        assert_eq!(PositionalThreshold::Fraction(0.5).distance(-40.0), 20.0);
    }

    #[test]
    fn config_builders_clamp() {
        let c = SettleConfig::default()
            .velocity_threshold(-5.0)
            .tolerance(f64::NAN);
        assert_eq!(c.velocity_threshold, 0.0);
        assert_eq!(c.tolerance, DEFAULT_TOLERANCE);
    }

    #[test]
    fn engine_runs_to_exact_anchor() {
        let anchors = map();
        let spec = AnimationSpec::tween(Duration::from_millis(100), Easing::Linear);
        let (ticket, resolver) = SettleTicket::pair();
        let mut engine = SettleEngine::new();
        engine
            .settle_to(
                &anchors,
                &spec,
                100.0,
                0.0,
                &Detent::fully_expanded(),
                SettleKind::Explicit,
                Some(resolver),
            )
            .unwrap();
        assert_eq!(engine.kind(), Some(SettleKind::Explicit));

        let mut last = SettleStep::Idle;
        for _ in 0..20 {
            last = engine.advance(MS_16, DEFAULT_TOLERANCE);
            if matches!(last, SettleStep::Finished { .. }) {
                break;
            }
        }
        assert_eq!(
            last,
            SettleStep::Finished {
                target: Detent::fully_expanded(),
                position: 0.0
            }
        );
        assert!(!engine.is_running());
        assert_eq!(
            ticket.outcome(),
            Some(SettleOutcome::Reached(Detent::fully_expanded()))
        );
    }

    #[test]
    fn new_settle_supersedes_old_ticket() {
        let anchors = map();
        let spec = AnimationSpec::default();
        let mut engine = SettleEngine::new();
        let (first, resolver) = SettleTicket::pair();
        engine
            .settle_to(&anchors, &spec, 100.0, 0.0, &peek(), SettleKind::Explicit, Some(resolver))
            .unwrap();
        engine.advance(MS_16, DEFAULT_TOLERANCE);
        let (position, velocity) = engine.state().unwrap();

        engine
            .settle_to(
                &anchors,
                &spec,
                position,
                velocity,
                &Detent::hidden(),
                SettleKind::Explicit,
                None,
            )
            .unwrap();
        assert_eq!(first.outcome(), Some(SettleOutcome::Superseded));
        assert_eq!(engine.state().map(|s| s.0), Some(position));
    }

    #[test]
    fn unanchored_target_is_an_error() {
        let anchors = map();
        let mut engine = SettleEngine::new();
        let err = engine
            .settle_to(
                &anchors,
                &AnimationSpec::default(),
                0.0,
                0.0,
                &Detent::fixed("half", 50.0),
                SettleKind::Explicit,
                None,
            )
            .unwrap_err();
        assert_eq!(err, SheetError::DetentNotInAnchors { id: "half".into() });
        assert!(!engine.is_running());
    }

    #[test]
    fn cancel_reports_position_and_supersedes() {
        let anchors = map();
        let mut engine = SettleEngine::new();
        let (ticket, resolver) = SettleTicket::pair();
        engine
            .settle_to(
                &anchors,
                &AnimationSpec::default(),
                100.0,
                0.0,
                &Detent::fully_expanded(),
                SettleKind::Explicit,
                Some(resolver),
            )
            .unwrap();
        engine.advance(MS_16, DEFAULT_TOLERANCE);
        let (position, _) = engine.cancel().unwrap();
        assert!(position < 100.0 && position > 0.0);
        assert_eq!(ticket.outcome(), Some(SettleOutcome::Superseded));
        assert_eq!(engine.advance(MS_16, DEFAULT_TOLERANCE), SettleStep::Idle);
    }

    #[test]
    fn retarget_keeps_position() {
        let anchors = map();
        let spec = AnimationSpec::default();
        let mut engine = SettleEngine::new();
        engine
            .settle_to(&anchors, &spec, 100.0, 0.0, &peek(), SettleKind::Explicit, None)
            .unwrap();
        engine.advance(MS_16 * 5, DEFAULT_TOLERANCE);
        let before = engine.state().unwrap().0;
        engine.retarget(&spec, before, 20.0);
        assert_eq!(engine.state().unwrap().0, before);
        let mut finished = None;
        for _ in 0..100 {
            if let SettleStep::Finished { position, .. } =
                engine.advance(MS_16, DEFAULT_TOLERANCE)
            {
                finished = Some(position);
                break;
            }
        }
        assert_eq!(finished, Some(20.0));
    }
}
