#![forbid(unsafe_code)]

//! The detent sheet state machine.
//!
//! [`SheetState`] owns everything a draggable sheet needs between frames:
//! the configured detents, the anchors resolved for the last measured
//! layout, the committed (`current`) and requested (`target`) detents, the
//! raw offset, and whichever drag or settle is in flight. Hosts feed it
//! layout sizes, drag input and frame deltas; render and accessibility
//! collaborators read the derived getters.
//!
//! # Coordinates
//!
//! `raw_offset` is the distance from the container top to the sheet top.
//! Positive drag deltas and velocities move the sheet down (closing).
//! [`SheetState::offset`] is the visible sheet size, `container - raw_offset`:
//! 0 when hidden, the content size when fully expanded.
//!
//! # Invariants
//!
//! 1. `current_detent` and `target_detent` are always configured detents.
//! 2. `current_detent` only changes when a settle commits (or a jump, or a
//!    pre-layout request, which commit immediately). Drag frames never
//!    change it.
//! 3. Once laid out, `raw_offset` stays within the anchor bounds.
//! 4. When idle, `raw_offset` equals the current detent's anchor exactly.
//! 5. Interrupting a settle (new request, drag grab, layout change) never
//!    moves the sheet discontinuously.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Layout not measured | `raw_offset`/`offset` read `NaN`; requests commit instantly; drags ignored |
//! | Unknown detent passed to a mutation | [`SheetError::UnknownDetent`], state untouched |
//! | Sizing function returns `NaN` | Detent resolves to 0 (hidden position) |
//! | Non-finite drag delta or velocity | Delta ignored / velocity treated as 0 |

use std::fmt;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use unstyled_core::animation::AnimationSpec;

use crate::anchors::AnchorMap;
use crate::detent::{Detent, DetentSet};
use crate::drag::DragCoordinator;
use crate::error::SheetError;
use crate::settle::{SettleConfig, SettleEngine, SettleKind, SettleStep, select_target};
use crate::ticket::{SettleOutcome, SettleTicket, TicketResolver};

/// Veto consulted before a gesture commits to a new detent: `(from, to)`.
pub type ConfirmFn = dyn Fn(&Detent, &Detent) -> bool + Send + Sync;

/// Construction parameters for a [`SheetState`].
#[derive(Clone)]
pub struct SheetConfig {
    detents: Vec<Detent>,
    initial: Detent,
    animation: AnimationSpec,
    settle: SettleConfig,
    reduced_motion: bool,
    confirm: Option<Arc<ConfirmFn>>,
}

impl fmt::Debug for SheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetConfig")
            .field("detents", &self.detents)
            .field("initial", &self.initial)
            .field("animation", &self.animation)
            .field("settle", &self.settle)
            .field("reduced_motion", &self.reduced_motion)
            .field("confirm", &self.confirm.is_some())
            .finish()
    }
}

impl SheetConfig {
    /// Configure a sheet with `detents`, starting at `initial`.
    pub fn new(detents: impl IntoIterator<Item = Detent>, initial: Detent) -> Self {
        Self {
            detents: detents.into_iter().collect(),
            initial,
            animation: AnimationSpec::default(),
            settle: SettleConfig::default(),
            reduced_motion: false,
            confirm: None,
        }
    }

    /// Interpolation used for every settle.
    #[must_use]
    pub fn animation(mut self, spec: AnimationSpec) -> Self {
        self.animation = spec;
        self
    }

    /// Target selection thresholds.
    #[must_use]
    pub fn settle(mut self, settle: SettleConfig) -> Self {
        self.settle = settle;
        self
    }

    /// Replace every animation with an instant snap.
    #[must_use]
    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Veto for gesture-driven detent changes.
    ///
    /// Called with `(current, proposed)` when a drag release or cancel would
    /// move the sheet to a different detent. Returning `false` settles back
    /// to the current detent instead. Programmatic requests are not vetoed.
    #[must_use]
    pub fn confirm_detent_change(
        mut self,
        confirm: impl Fn(&Detent, &Detent) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.confirm = Some(Arc::new(confirm));
        self
    }

    /// Initial detent.
    #[must_use]
    pub fn initial(&self) -> &Detent {
        &self.initial
    }

    /// The interpolation settles will actually use.
    #[must_use]
    pub fn effective_animation(&self) -> AnimationSpec {
        if self.reduced_motion {
            AnimationSpec::Snap
        } else {
            self.animation.clone()
        }
    }
}

/// What the sheet is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetPhase {
    /// At rest.
    Idle,
    /// Following a drag.
    Dragging,
    /// Animating toward `target_detent`.
    Settling(SettleKind),
}

/// Observable state change, queued until [`SheetState::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    /// `current_detent` changed.
    DetentChanged {
        /// Previous detent.
        from: Detent,
        /// New detent.
        to: Detent,
    },
    /// A settle started.
    SettleStarted {
        /// Destination.
        target: Detent,
        /// What started it.
        kind: SettleKind,
    },
    /// A settle reached its destination.
    SettleFinished {
        /// Detent reached.
        detent: Detent,
    },
    /// A settle was replaced before finishing.
    SettleSuperseded {
        /// Abandoned destination.
        target: Detent,
    },
}

/// Detent-based draggable sheet state machine.
pub struct SheetState {
    detents: DetentSet,
    initial: Detent,
    animation: AnimationSpec,
    settle_config: SettleConfig,
    confirm: Option<Arc<ConfirmFn>>,
    container: f64,
    content: f64,
    anchors: Option<AnchorMap>,
    current: Detent,
    target: Detent,
    raw_offset: f64,
    velocity: f64,
    drag: DragCoordinator,
    engine: SettleEngine,
    events: Vec<SheetEvent>,
    /// Headed somewhere visible since last resting at hidden.
    left_hidden: bool,
    hide_count: u64,
}

impl fmt::Debug for SheetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetState")
            .field("current", &self.current)
            .field("target", &self.target)
            .field("raw_offset", &self.raw_offset)
            .field("velocity", &self.velocity)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl SheetState {
    /// Build a sheet from `config`.
    ///
    /// Fails if the detent list is empty, contains duplicate identifiers,
    /// or does not contain the initial detent.
    pub fn new(config: SheetConfig) -> Result<Self, SheetError> {
        let animation = config.effective_animation();
        let SheetConfig {
            detents,
            initial,
            settle,
            confirm,
            ..
        } = config;
        let detents = DetentSet::new(detents)?;
        let initial = detents
            .get(initial.id())
            .cloned()
            .ok_or_else(|| SheetError::InitialDetentMissing {
                id: initial.id().to_owned(),
            })?;
        let left_hidden = !initial.is_hidden();
        Ok(Self {
            detents,
            initial: initial.clone(),
            animation,
            settle_config: settle,
            confirm,
            container: f64::NAN,
            content: f64::NAN,
            anchors: None,
            current: initial.clone(),
            target: initial,
            raw_offset: f64::NAN,
            velocity: 0.0,
            drag: DragCoordinator::new(),
            engine: SettleEngine::new(),
            events: Vec::new(),
            left_hidden,
            hide_count: 0,
        })
    }

    // --- Layout -----------------------------------------------------------

    /// Report the container height. Rebuilds anchors when it changes.
    pub fn report_container_size(&mut self, size: f64) {
        if same_size(self.container, size) {
            return;
        }
        self.container = size;
        self.rebuild_anchors();
    }

    /// Report the content height. Rebuilds anchors when it changes.
    pub fn report_content_size(&mut self, size: f64) {
        if same_size(self.content, size) {
            return;
        }
        self.content = size;
        self.rebuild_anchors();
    }

    /// Re-resolve every detent against the last reported sizes.
    ///
    /// Call when a sizing function depends on state outside the sheet.
    pub fn invalidate_detents(&mut self) {
        self.rebuild_anchors();
    }

    fn rebuild_anchors(&mut self) {
        let Some(anchors) = AnchorMap::rebuild(&self.detents, self.container, self.content) else {
            return;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "sheet.anchors.rebuild",
            container = self.container,
            content = self.content,
            current = %self.current,
        );

        if self.drag.is_active() {
            self.raw_offset = anchors.clamp(self.raw_offset);
        } else if let Some((position, _)) = self.engine.state() {
            let from = anchors.clamp(position);
            if let Some(target_offset) = anchors.offset_of(&self.target) {
                self.engine.retarget(&self.animation, from, target_offset);
            }
            self.raw_offset = from;
        } else if let Some(offset) = anchors.offset_of(&self.current) {
            self.raw_offset = offset;
        }
        self.anchors = Some(anchors);
    }

    // --- Programmatic transitions ------------------------------------------

    /// Animate to `detent`, returning a ticket that resolves when the settle
    /// reaches it or is superseded.
    ///
    /// Before the first layout the change commits instantly and the ticket
    /// is already resolved.
    pub fn animate_to(&mut self, detent: &Detent) -> Result<SettleTicket, SheetError> {
        let detent = self.member(detent)?;
        if self.anchors.is_none() {
            self.end_drag();
            self.commit(detent.clone());
            return Ok(SettleTicket::resolved(SettleOutcome::Reached(detent)));
        }
        if self.is_idle() && self.current == detent {
            return Ok(SettleTicket::resolved(SettleOutcome::Reached(detent)));
        }
        let (ticket, resolver) = SettleTicket::pair();
        let velocity = self.engine.state().map_or(0.0, |(_, v)| v);
        self.end_drag();
        self.begin_settle(detent, velocity, SettleKind::Explicit, Some(resolver))?;
        Ok(ticket)
    }

    /// Request `detent` without waiting for the settle to finish.
    pub fn set_current_detent(&mut self, detent: &Detent) -> Result<(), SheetError> {
        self.animate_to(detent).map(drop)
    }

    /// Move to `detent` instantly. Idle on return.
    pub fn jump_to(&mut self, detent: &Detent) -> Result<(), SheetError> {
        let detent = self.member(detent)?;
        self.end_drag();
        self.supersede();
        if let Some(offset) = self.anchors.as_ref().and_then(|a| a.offset_of(&detent)) {
            self.raw_offset = offset;
        }
        self.velocity = 0.0;
        self.commit(detent);
        Ok(())
    }

    // --- Gestures -------------------------------------------------------------

    /// Begin a drag, grabbing any in-flight settle at its current position.
    ///
    /// Ignored before the first layout.
    pub fn on_drag_start(&mut self) {
        if self.anchors.is_none() || self.drag.is_active() {
            return;
        }
        self.supersede();
        self.target = self.current.clone();
        self.velocity = 0.0;
        self.drag.start(self.raw_offset);
        #[cfg(feature = "tracing")]
        tracing::trace!(message = "sheet.drag.start", offset = self.raw_offset);
    }

    /// Apply a drag delta and return the new raw offset.
    ///
    /// Starts a drag implicitly. Ignored before the first layout.
    pub fn on_drag_delta(&mut self, delta: f64) -> f64 {
        if self.anchors.is_none() {
            return self.raw_offset;
        }
        if !self.drag.is_active() {
            self.on_drag_start();
        }
        if let Some(anchors) = &self.anchors {
            self.raw_offset = self.drag.apply(
                self.raw_offset,
                delta,
                anchors.min_offset(),
                anchors.max_offset(),
            );
        }
        self.raw_offset
    }

    /// Release the drag with `velocity` (units per second, positive closing)
    /// and settle. Returns the chosen detent, or `None` if no drag was active.
    pub fn on_drag_end(&mut self, velocity: f64) -> Option<Detent> {
        if !self.drag.is_active() {
            return None;
        }
        self.drag.end();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "sheet.drag.end",
            start = self.drag.start_offset(),
            offset = self.raw_offset,
            travelled = self.drag.travelled(),
            velocity,
        );
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        let chosen = select_target(
            self.anchors.as_ref()?,
            &self.current,
            self.raw_offset,
            velocity,
            &self.settle_config,
        );
        Some(self.settle_gesture(chosen, velocity))
    }

    /// Abandon the drag (focus loss, pointer capture lost) and settle to the
    /// closest detent with zero velocity.
    pub fn on_drag_cancel(&mut self) -> Option<Detent> {
        if !self.drag.is_active() {
            return None;
        }
        self.drag.end();
        let chosen = self.anchors.as_ref()?.closest(self.raw_offset)?.clone();
        Some(self.settle_gesture(chosen, 0.0))
    }

    fn settle_gesture(&mut self, chosen: Detent, velocity: f64) -> Detent {
        let vetoed = chosen != self.current
            && self
                .confirm
                .as_ref()
                .is_some_and(|confirm| !confirm(&self.current, &chosen));
        let chosen = if vetoed {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "sheet.settle.vetoed",
                proposed = %chosen,
                current = %self.current,
            );
            self.current.clone()
        } else {
            chosen
        };
        // Gesture targets always come from the anchor map.
        if self
            .begin_settle(chosen.clone(), velocity, SettleKind::Velocity, None)
            .is_err()
        {
            self.commit(self.current.clone());
        }
        chosen
    }

    fn end_drag(&mut self) {
        if self.drag.is_active() {
            self.drag.end();
        }
    }

    // --- Frames ---------------------------------------------------------------

    /// Advance the in-flight settle by `dt`.
    ///
    /// Returns `true` while a settle is still running afterwards.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.step(dt);
        self.engine.is_running()
    }

    fn step(&mut self, dt: Duration) {
        match self.engine.advance(dt, self.settle_config.tolerance) {
            SettleStep::Idle => {}
            SettleStep::Moving { position, velocity } => {
                self.raw_offset = match &self.anchors {
                    Some(anchors) => anchors.clamp(position),
                    None => position,
                };
                self.velocity = velocity;
            }
            SettleStep::Finished { target, position } => {
                self.raw_offset = position;
                self.velocity = 0.0;
                self.commit(target.clone());
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    message = "sheet.settle.finish",
                    detent = %target,
                    offset = position,
                );
                self.events.push(SheetEvent::SettleFinished { detent: target });
            }
        }
    }

    fn begin_settle(
        &mut self,
        target: Detent,
        velocity: f64,
        kind: SettleKind,
        resolver: Option<TicketResolver>,
    ) -> Result<(), SheetError> {
        let Some(anchors) = &self.anchors else {
            self.commit(target);
            return Ok(());
        };
        let previous = self.engine.target().cloned();
        self.engine.settle_to(
            anchors,
            &self.animation,
            self.raw_offset,
            velocity,
            &target,
            kind,
            resolver,
        )?;
        if let Some(previous) = previous {
            self.note_superseded(previous);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "sheet.settle.start",
            kind = ?kind,
            from = %self.current,
            to = %target,
            offset = self.raw_offset,
            velocity,
        );
        if !target.is_hidden() {
            self.left_hidden = true;
        }
        self.target = target.clone();
        self.velocity = velocity;
        self.events.push(SheetEvent::SettleStarted { target, kind });
        if self.animation.is_instant() {
            self.step(Duration::ZERO);
        }
        Ok(())
    }

    fn supersede(&mut self) {
        let target = self.engine.target().cloned();
        if let Some((position, velocity)) = self.engine.cancel() {
            self.raw_offset = match &self.anchors {
                Some(anchors) => anchors.clamp(position),
                None => position,
            };
            self.velocity = velocity;
        }
        if let Some(target) = target {
            self.note_superseded(target);
        }
    }

    fn note_superseded(&mut self, target: Detent) {
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sheet.settle.superseded", target = %target);
        self.events.push(SheetEvent::SettleSuperseded { target });
    }

    fn commit(&mut self, detent: Detent) {
        if self.current != detent {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "sheet.commit", from = %self.current, to = %detent);
            let from = mem::replace(&mut self.current, detent.clone());
            self.events.push(SheetEvent::DetentChanged {
                from,
                to: detent.clone(),
            });
        }
        if !detent.is_hidden() {
            self.left_hidden = true;
        } else if self.left_hidden {
            self.left_hidden = false;
            self.hide_count += 1;
        }
        self.target = detent;
    }

    /// Drop queued events and hide history, as if freshly built at the
    /// current detent.
    pub(crate) fn forget_history(&mut self) {
        self.events.clear();
        self.left_hidden = !self.current.is_hidden();
        self.hide_count = 0;
    }

    fn member(&self, detent: &Detent) -> Result<Detent, SheetError> {
        self.detents.require(detent)?;
        self.detents
            .get(detent.id())
            .cloned()
            .ok_or_else(|| SheetError::UnknownDetent {
                id: detent.id().to_owned(),
            })
    }

    // --- Derived state ------------------------------------------------------

    /// Visible sheet size: `container - raw_offset`. `NaN` before layout.
    #[must_use]
    pub fn offset(&self) -> f64 {
        match &self.anchors {
            Some(anchors) => anchors.container_size() - self.raw_offset,
            None => f64::NAN,
        }
    }

    /// Fraction of the way from the current detent's anchor to the target's,
    /// in [0, 1]. 1 when they share an anchor.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.fraction(&self.current, &self.target).unwrap_or(1.0)
    }

    /// Fraction of the way from `from`'s anchor to `to`'s, in [0, 1].
    ///
    /// `NaN` before layout or for detents without an anchor.
    #[must_use]
    pub fn progress_between(&self, from: &Detent, to: &Detent) -> f64 {
        self.fraction(from, to).unwrap_or(f64::NAN)
    }

    fn fraction(&self, from: &Detent, to: &Detent) -> Option<f64> {
        let anchors = self.anchors.as_ref()?;
        let a = anchors.offset_of(from)?;
        let b = anchors.offset_of(to)?;
        if (b - a).abs() < f64::EPSILON {
            return Some(1.0);
        }
        let t = (self.raw_offset - a) / (b - a);
        Some(if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 })
    }

    /// At rest on the current detent with nothing pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase() == SheetPhase::Idle && self.current == self.target && self.progress() >= 1.0
    }

    /// What the sheet is doing.
    #[must_use]
    pub fn phase(&self) -> SheetPhase {
        if self.drag.is_active() {
            SheetPhase::Dragging
        } else if let Some(kind) = self.engine.kind() {
            SheetPhase::Settling(kind)
        } else {
            SheetPhase::Idle
        }
    }

    /// Last committed detent.
    #[inline]
    #[must_use]
    pub fn current_detent(&self) -> &Detent {
        &self.current
    }

    /// Detent the sheet is heading to (equals current when idle).
    #[inline]
    #[must_use]
    pub fn target_detent(&self) -> &Detent {
        &self.target
    }

    /// Detent the sheet was configured to start at.
    #[inline]
    #[must_use]
    pub fn initial_detent(&self) -> &Detent {
        &self.initial
    }

    /// Distance from the container top to the sheet top. `NaN` before layout.
    #[inline]
    #[must_use]
    pub fn raw_offset(&self) -> f64 {
        self.raw_offset
    }

    /// Current velocity (units per second, positive closing).
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Configured detents.
    #[inline]
    #[must_use]
    pub fn detents(&self) -> &DetentSet {
        &self.detents
    }

    /// Anchors for the last measured layout.
    #[inline]
    #[must_use]
    pub fn anchors(&self) -> Option<&AnchorMap> {
        self.anchors.as_ref()
    }

    /// Settle thresholds in use.
    #[inline]
    #[must_use]
    pub fn settle_config(&self) -> &SettleConfig {
        &self.settle_config
    }

    /// Number of times the sheet has come to rest at hidden after heading
    /// somewhere visible.
    ///
    /// Never decreases. Observers compare it against the value they last
    /// saw, so an open-and-close that happens between two observations is
    /// still counted.
    #[inline]
    #[must_use]
    pub fn hide_count(&self) -> u64 {
        self.hide_count
    }

    /// Take the queued events.
    pub fn drain_events(&mut self) -> Vec<SheetEvent> {
        mem::take(&mut self.events)
    }
}

fn same_size(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}
