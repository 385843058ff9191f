#![forbid(unsafe_code)]

//! Sheet configuration and state errors.
//!
//! Two families, both fatal at the call that triggered them:
//!
//! - **Invalid configuration**: the detent list cannot back a sheet
//!   (empty, duplicate identifiers, initial detent missing) or a caller
//!   named a detent the sheet was not configured with.
//! - **Invalid state**: a settle was requested toward a detent that has no
//!   resolved anchor. This is a programming error, never a runtime condition.
//!
//! Superseded settles and unmeasured layout are *not* errors: the former
//! resolves a ticket as [`SettleOutcome::Superseded`], the latter reads as
//! `NaN` offsets.
//!
//! [`SettleOutcome::Superseded`]: crate::ticket::SettleOutcome::Superseded

use std::fmt;

/// Errors raised by sheet construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// The detent list was empty.
    EmptyDetents,
    /// The initial detent is not among the configured detents.
    InitialDetentMissing {
        /// Identifier of the missing initial detent.
        id: String,
    },
    /// Two configured detents share an identifier.
    DuplicateDetent {
        /// The repeated identifier.
        id: String,
    },
    /// A mutation named a detent the sheet was not configured with.
    UnknownDetent {
        /// Identifier of the unknown detent.
        id: String,
    },
    /// A settle targeted a detent with no resolved anchor.
    DetentNotInAnchors {
        /// Identifier of the unanchored detent.
        id: String,
    },
}

impl SheetError {
    /// Whether this error stems from configuration (as opposed to state).
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::DetentNotInAnchors { .. })
    }

    /// Short label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyDetents => "empty_detents",
            Self::InitialDetentMissing { .. } => "initial_detent_missing",
            Self::DuplicateDetent { .. } => "duplicate_detent",
            Self::UnknownDetent { .. } => "unknown_detent",
            Self::DetentNotInAnchors { .. } => "detent_not_in_anchors",
        }
    }
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDetents => write!(f, "sheet requires at least one detent"),
            Self::InitialDetentMissing { id } => {
                write!(f, "initial detent '{id}' is not among the configured detents")
            }
            Self::DuplicateDetent { id } => write!(f, "detent identifier '{id}' appears twice"),
            Self::UnknownDetent { id } => {
                write!(f, "detent '{id}' is not configured for this sheet")
            }
            Self::DetentNotInAnchors { id } => {
                write!(f, "cannot settle toward '{id}': no resolved anchor")
            }
        }
    }
}

impl std::error::Error for SheetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_detent() {
        let err = SheetError::DuplicateDetent { id: "peek".into() };
        assert!(err.to_string().contains("'peek'"));
        let err = SheetError::DetentNotInAnchors { id: "half".into() };
        assert!(err.to_string().contains("'half'"));
    }

    #[test]
    fn configuration_vs_state() {
        assert!(SheetError::EmptyDetents.is_configuration());
        assert!(SheetError::UnknownDetent { id: "x".into() }.is_configuration());
        assert!(!SheetError::DetentNotInAnchors { id: "x".into() }.is_configuration());
    }

    #[test]
    fn kinds_are_distinct() {
        let all = [
            SheetError::EmptyDetents,
            SheetError::InitialDetentMissing { id: "a".into() },
            SheetError::DuplicateDetent { id: "a".into() },
            SheetError::UnknownDetent { id: "a".into() },
            SheetError::DetentNotInAnchors { id: "a".into() },
        ];
        let mut kinds: Vec<_> = all.iter().map(SheetError::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), all.len());
    }
}
