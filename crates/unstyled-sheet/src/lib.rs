#![forbid(unsafe_code)]

//! Detent-based draggable sheet state machine.
//!
//! # Role in unstyled
//! `unstyled-sheet` is the behavior behind the bottom-sheet and modal
//! bottom-sheet components. It owns no rendering: hosts report layout
//! sizes and gestures, advance time with `tick`, and read back offsets,
//! progress, and idle-ness.
//!
//! # Pieces
//! - [`Detent`] / [`DetentSet`]: named resting positions.
//! - [`AnchorMap`]: detents resolved to offsets for one layout.
//! - [`DragCoordinator`]: clamped drag accumulation.
//! - [`SettleEngine`] and [`select_target`]: where to settle and how to get there.
//! - [`SheetState`]: the state machine tying them together.
//! - [`ModalCoordinator`] and [`ScrimTransition`]: mount, scrim, dismiss.
//! - [`SettleTicket`]: awaitable result of [`SheetState::animate_to`].
//!
//! # Feature Flags
//! - `tracing`: structured `tracing` events for commits, settles, and modal
//!   lifecycle.
//! - `state-persistence`: `serde` derives on [`SheetPersistState`].

pub mod anchors;
pub mod detent;
pub mod drag;
pub mod error;
pub mod modal;
pub mod persist;
pub mod scrim;
pub mod settle;
pub mod sheet;
pub mod ticket;

pub use anchors::AnchorMap;
pub use detent::{Detent, DetentSet, SizingFn};
pub use drag::DragCoordinator;
pub use error::SheetError;
pub use modal::{ModalCoordinator, ModalProperties, ModalVisibility};
pub use persist::SheetPersistState;
pub use scrim::{ScrimConfig, ScrimPhase, ScrimTransition};
pub use settle::{
    PositionalThreshold, SettleConfig, SettleEngine, SettleKind, SettleStep, select_target,
};
pub use sheet::{ConfirmFn, SheetConfig, SheetEvent, SheetPhase, SheetState};
pub use ticket::{SettleOutcome, SettleTicket, TicketResolver};

pub use unstyled_core::animation::{AnimationSpec, DecaySpec, Easing, Motion, MotionFactory};
