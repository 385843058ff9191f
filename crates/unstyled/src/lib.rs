#![forbid(unsafe_code)]

//! Unstyled public facade crate.
//!
//! This crate provides the stable surface area for hosts embedding the
//! unstyled components. It re-exports the component state machines and
//! motion primitives from the internal crates and offers a prelude for
//! day-to-day usage.

pub mod error;

pub use error::{DegradationAction, Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use unstyled_core::animation::{
    Animation, AnimationSpec, DecaySpec, Easing, Motion, MotionFactory,
};
pub use unstyled_core::clock::FrameClock;

// --- Sheet re-exports ------------------------------------------------------

pub use unstyled_sheet::{
    AnchorMap, ConfirmFn, Detent, DetentSet, DragCoordinator, ModalCoordinator, ModalProperties,
    ModalVisibility, PositionalThreshold, ScrimConfig, ScrimPhase, ScrimTransition, SettleConfig,
    SettleKind, SettleOutcome, SettleTicket, SheetConfig, SheetError, SheetEvent, SheetPhase,
    SheetPersistState, SheetState,
};

// --- Crate modules ---------------------------------------------------------

pub use unstyled_core as core;
pub use unstyled_sheet as sheet;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnimationSpec, Detent, Easing, Error, FrameClock, ModalCoordinator, ModalProperties,
        Result, ScrimConfig, SettleOutcome, SheetConfig, SheetEvent, SheetPhase, SheetState,
    };

    pub use crate::{core, sheet};
}
