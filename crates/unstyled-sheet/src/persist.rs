#![forbid(unsafe_code)]

//! Sheet state persistence.
//!
//! Only the committed detent's identifier survives a save. Positions,
//! velocities, and in-flight settles are transient and are rebuilt from the
//! next layout. With the `state-persistence` feature the saved state is
//! `serde`-serializable.

use crate::error::SheetError;
use crate::sheet::{SheetConfig, SheetState};

// ============================================================================
// Stateful Persistence
// ============================================================================

/// Persistable state for a [`SheetState`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SheetPersistState {
    /// Identifier of the committed detent.
    pub detent: String,
}

impl SheetState {
    /// Capture the state worth restoring.
    #[must_use]
    pub fn save_state(&self) -> SheetPersistState {
        SheetPersistState {
            detent: self.current_detent().id().to_owned(),
        }
    }

    /// Rebuild a sheet from `config`, starting at the saved detent.
    ///
    /// Falls back to the config's initial detent when the saved identifier
    /// is no longer configured. Configuration errors are reported as from
    /// [`SheetState::new`].
    pub fn restore(config: SheetConfig, saved: &SheetPersistState) -> Result<Self, SheetError> {
        let mut sheet = Self::new(config)?;
        let Some(detent) = sheet.detents().get(&saved.detent).cloned() else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "sheet.restore.fallback",
                saved = %saved.detent,
                initial = %sheet.initial_detent(),
            );
            return Ok(sheet);
        };
        sheet.jump_to(&detent)?;
        sheet.forget_history();
        Ok(sheet)
    }
}
