#![forbid(unsafe_code)]

//! Facade error model and graceful degradation.
//!
//! Component crates raise their own typed errors. The facade wraps them in
//! a single [`Error`] so hosts can `?` across components and ask each error
//! what to do next via [`Error::degradation`].

use std::fmt;

use unstyled_sheet::SheetError;

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for unstyled hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Sheet configuration or state failure.
    Sheet(SheetError),
}

/// Standard result type for unstyled APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Graceful Degradation ────────────────────────────────────────────────

/// What the host should do when a component call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Leave the component unrendered until it is reconfigured.
    SkipRender,
    /// Drop the component's state and rebuild it from its configuration.
    ResetState,
}

impl Error {
    /// Determine the graceful degradation action for this error.
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Sheet(SheetError::DetentNotInAnchors { .. }) => DegradationAction::ResetState,
            Self::Sheet(_) => DegradationAction::SkipRender,
        }
    }

    /// Error type label for metrics and tracing.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Sheet(_) => "sheet",
        }
    }

    /// Whether the host can recover by resetting state rather than fixing
    /// its configuration.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.degradation(), DegradationAction::ResetState)
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sheet(err) => write!(f, "sheet: {err}"),
        }
    }
}

impl fmt::Display for DegradationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkipRender => write!(f, "skip_render"),
            Self::ResetState => write!(f, "reset_state"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sheet(err) => Some(err),
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<SheetError> for Error {
    fn from(err: SheetError) -> Self {
        Self::Sheet(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
