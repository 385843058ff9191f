#![forbid(unsafe_code)]

//! Anchor map: detents resolved to pixel offsets for one layout.
//!
//! An anchor is the distance from the top of the container to the top of
//! the sheet when it rests at a detent: `container - resolved_size`. Larger
//! offsets are lower on screen (more closed); the hidden detent sits at the
//! container bottom.
//!
//! # Invariants
//!
//! 1. Every detent of the set the map was built from has exactly one entry,
//!    in configured order.
//! 2. `min_offset() <= offset <= max_offset()` for every entry.
//! 3. A map exists only for a measured layout: [`AnchorMap::rebuild`]
//!    returns `None` while either size is unknown.

use crate::detent::{Detent, DetentSet};

/// Resolved offsets for every configured detent at one layout size.
#[derive(Debug, Clone)]
pub struct AnchorMap {
    entries: Vec<(Detent, f64)>,
    container: f64,
    content: f64,
    min_offset: f64,
    max_offset: f64,
}

fn is_measured(size: f64) -> bool {
    size.is_finite() && size >= 0.0
}

impl AnchorMap {
    /// Resolve every detent against the given layout.
    ///
    /// Returns `None` while the container or content size is unknown
    /// (non-finite or negative); the caller keeps its previous map.
    #[must_use]
    pub fn rebuild(detents: &DetentSet, container: f64, content: f64) -> Option<Self> {
        if !is_measured(container) || !is_measured(content) {
            return None;
        }
        let mut min_offset = f64::INFINITY;
        let mut max_offset = f64::NEG_INFINITY;
        let entries = detents
            .iter()
            .map(|detent| {
                let offset = container - detent.resolve(container, content);
                min_offset = min_offset.min(offset);
                max_offset = max_offset.max(offset);
                (detent.clone(), offset)
            })
            .collect();
        Some(Self {
            entries,
            container,
            content,
            min_offset,
            max_offset,
        })
    }

    /// Container size the map was built for.
    #[inline]
    #[must_use]
    pub fn container_size(&self) -> f64 {
        self.container
    }

    /// Content size the map was built for.
    #[inline]
    #[must_use]
    pub fn content_size(&self) -> f64 {
        self.content
    }

    /// Offset of the most open detent (closest to the container top).
    #[inline]
    #[must_use]
    pub fn min_offset(&self) -> f64 {
        self.min_offset
    }

    /// Offset of the most closed detent.
    #[inline]
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    /// Offset of `detent`, if it is part of this map.
    #[must_use]
    pub fn offset_of(&self, detent: &Detent) -> Option<f64> {
        self.entries
            .iter()
            .find(|(d, _)| d == detent)
            .map(|&(_, offset)| offset)
    }

    /// Whether `position` sits on `detent`'s anchor (within `tolerance`).
    #[must_use]
    pub fn is_at(&self, detent: &Detent, position: f64, tolerance: f64) -> bool {
        self.offset_of(detent)
            .is_some_and(|offset| (offset - position).abs() <= tolerance)
    }

    /// Clamp `position` into `[min_offset, max_offset]`.
    #[must_use]
    pub fn clamp(&self, position: f64) -> f64 {
        position.clamp(self.min_offset, self.max_offset)
    }

    /// Detent whose anchor is closest to `position`.
    ///
    /// Ties go to the detent listed first.
    #[must_use]
    pub fn closest(&self, position: f64) -> Option<&Detent> {
        let mut best: Option<(&Detent, f64)> = None;
        for (detent, offset) in &self.entries {
            let distance = (offset - position).abs();
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((detent, distance));
            }
        }
        best.map(|(detent, _)| detent)
    }

    /// Nearest anchor strictly above `position` (smaller offset).
    #[must_use]
    pub fn above(&self, position: f64) -> Option<(&Detent, f64)> {
        self.entries
            .iter()
            .filter(|(_, offset)| *offset < position)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(d, o)| (d, *o))
    }

    /// Nearest anchor strictly below `position` (larger offset).
    #[must_use]
    pub fn below(&self, position: f64) -> Option<(&Detent, f64)> {
        self.entries
            .iter()
            .filter(|(_, offset)| *offset > position)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(d, o)| (d, *o))
    }

    /// Nearest anchors strictly above and below `position`.
    #[must_use]
    pub fn neighbors(&self, position: f64) -> (Option<&Detent>, Option<&Detent>) {
        (
            self.above(position).map(|(d, _)| d),
            self.below(position).map(|(d, _)| d),
        )
    }

    /// Iterate `(detent, offset)` pairs in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (&Detent, f64)> {
        self.entries.iter().map(|(d, o)| (d, *o))
    }

    /// Number of anchors.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no anchors.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
