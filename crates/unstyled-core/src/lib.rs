// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: animation primitives, frame timing, and logging.
//!
//! # Role in unstyled
//! `unstyled-core` is the motion layer. It knows nothing about sheets,
//! detents, or modals; it provides the pluggable interpolation strategies
//! (tweens, springs, snaps) and the decay projection that the component
//! crates drive from their own state machines.
//!
//! # Primary responsibilities
//! - **Animation / Motion**: tickable animations with a positional reading.
//! - **AnimationSpec**: a cloneable description that starts a [`Motion`].
//! - **DecaySpec**: fling projection for velocity-driven settling.
//! - **FrameClock**: turns frame timestamps into capped deltas.
//!
//! [`Motion`]: animation::Motion

pub mod animation;
pub mod clock;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
