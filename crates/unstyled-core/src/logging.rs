#![forbid(unsafe_code)]

//! Structured logging.
//!
//! With the `tracing` feature enabled the `tracing` macros are re-exported
//! here (and at the crate root). Call sites in the component crates guard
//! their events with `#[cfg(feature = "tracing")]` so that a build without
//! the feature carries no logging code at all.
//!
//! Event names follow a `component.action` scheme, e.g. `sheet.commit`,
//! `sheet.settle.start`, `modal.unmount`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Install a JSON formatting subscriber filtered by `RUST_LOG`.
///
/// Intended for production hosts that ship logs to a collector. Returns an
/// error if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
}
