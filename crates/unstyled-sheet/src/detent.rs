#![forbid(unsafe_code)]

//! Detents: named resting positions of a sheet.
//!
//! A [`Detent`] pairs a unique identifier with a sizing function
//! `(container, content) -> visible size`. Detents are immutable values;
//! clones share the sizing closure. Equality and hashing use the identifier
//! only, so a detent rebuilt after state restoration compares equal to the
//! one that was saved.
//!
//! [`DetentSet`] is the validated, ordered list a sheet is configured with.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::SheetError;

/// Sizing function: `(container_size, content_size) -> visible sheet size`.
pub type SizingFn = dyn Fn(f64, f64) -> f64 + Send + Sync;

/// A named candidate resting position for a sheet.
#[derive(Clone)]
pub struct Detent {
    id: Arc<str>,
    sizing: Arc<SizingFn>,
}

impl Detent {
    /// Identifier of [`Detent::hidden`].
    pub const HIDDEN: &'static str = "hidden";
    /// Identifier of [`Detent::fully_expanded`].
    pub const FULLY_EXPANDED: &'static str = "fully-expanded";

    /// Create a detent from an identifier and a sizing function.
    pub fn new(
        id: impl Into<Arc<str>>,
        sizing: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            sizing: Arc::new(sizing),
        }
    }

    /// The sheet is fully off-screen.
    #[must_use]
    pub fn hidden() -> Self {
        Self::new(Self::HIDDEN, |_, _| 0.0)
    }

    /// The whole content is visible.
    #[must_use]
    pub fn fully_expanded() -> Self {
        Self::new(Self::FULLY_EXPANDED, |_, content| content)
    }

    /// A detent showing a fixed amount of the sheet.
    pub fn fixed(id: impl Into<Arc<str>>, size: f64) -> Self {
        Self::new(id, move |_, _| size)
    }

    /// A detent showing a fraction of the container height.
    pub fn fraction_of_container(id: impl Into<Arc<str>>, fraction: f64) -> Self {
        Self::new(id, move |container, _| container * fraction)
    }

    /// Identifier, unique within a sheet.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this is the hidden detent.
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        &*self.id == Self::HIDDEN
    }

    /// Visible size at rest, clamped to `[0, content]`.
    ///
    /// A sizing function that yields a non-finite value resolves to 0.
    #[must_use]
    pub fn resolve(&self, container: f64, content: f64) -> f64 {
        let size = (self.sizing)(container, content);
        if !size.is_finite() {
            return 0.0;
        }
        size.clamp(0.0, content.max(0.0))
    }
}

impl PartialEq for Detent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Detent {}

impl Hash for Detent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Detent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Detent").field(&&*self.id).finish()
    }
}

impl fmt::Display for Detent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// A validated, ordered, non-empty set of detents with unique identifiers.
#[derive(Debug, Clone)]
pub struct DetentSet {
    detents: Vec<Detent>,
}

impl DetentSet {
    /// Validate and build a detent set.
    ///
    /// Fails with [`SheetError::EmptyDetents`] or
    /// [`SheetError::DuplicateDetent`].
    pub fn new(detents: impl IntoIterator<Item = Detent>) -> Result<Self, SheetError> {
        let detents: Vec<Detent> = detents.into_iter().collect();
        if detents.is_empty() {
            return Err(SheetError::EmptyDetents);
        }
        for (i, detent) in detents.iter().enumerate() {
            if detents[..i].contains(detent) {
                return Err(SheetError::DuplicateDetent {
                    id: detent.id().to_owned(),
                });
            }
        }
        Ok(Self { detents })
    }

    /// Number of detents.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.detents.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detents.is_empty()
    }

    /// Whether `detent` is a member.
    #[must_use]
    pub fn contains(&self, detent: &Detent) -> bool {
        self.detents.contains(detent)
    }

    /// Look up a member by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Detent> {
        self.detents.iter().find(|d| d.id() == id)
    }

    /// The hidden detent, if configured.
    #[must_use]
    pub fn hidden(&self) -> Option<&Detent> {
        self.get(Detent::HIDDEN)
    }

    /// Iterate in configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, Detent> {
        self.detents.iter()
    }

    /// Fail with [`SheetError::UnknownDetent`] unless `detent` is a member.
    pub fn require(&self, detent: &Detent) -> Result<(), SheetError> {
        if self.contains(detent) {
            Ok(())
        } else {
            Err(SheetError::UnknownDetent {
                id: detent.id().to_owned(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a DetentSet {
    type Item = &'a Detent;
    type IntoIter = std::slice::Iter<'a, Detent>;

    fn into_iter(self) -> Self::IntoIter {
        self.detents.iter()
    }
}
