// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible range computation for uniformly sized 1D strips.

use core::ops::Range;

use crate::{LinearGeometry, Scalar};

/// The slice of a linear strip that should be realized.
///
/// `start..end` are absolute indices into the host collection. `offset` is
/// the translation to apply to the first realized item and `total_extent` the
/// size of the spacer that keeps native scroll dimensions correct.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleRange<S: Scalar = f64> {
    /// First realized index (inclusive).
    pub start: usize,
    /// One past the last realized index.
    pub end: usize,
    /// Leading edge of `start`, equal to `start * item_extent`.
    pub offset: S,
    /// Extent of the whole strip, equal to `len * item_extent`.
    pub total_extent: S,
}

impl<S: Scalar> VisibleRange<S> {
    /// An empty range at the start of an empty strip.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            offset: S::zero(),
            total_extent: S::zero(),
        }
    }

    /// Number of realized items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if nothing needs to be realized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Realized indices as a range.
    #[must_use]
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns `true` if `index` is realized.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

/// Computes which items of a strip of `len` items should be realized.
///
/// ```text
/// start = clamp(floor(scroll / item_extent) - overscan, 0, len)
/// end   = clamp(start + ceil(container / item_extent) + 2 * overscan, 0, len)
/// ```
///
/// `end` is never smaller than the index after the last item intersecting
/// the viewport, so a partially visible trailing item is realized even with
/// zero overscan. This runs in O(1) regardless of `len`.
///
/// An unusable item extent (zero, negative, or not finite) yields an empty
/// range with a zero total extent. Negative or non-finite scroll offsets and
/// container extents are treated as zero.
///
/// ```rust
/// use understory_windowing::{LinearGeometry, compute_visible_range};
///
/// let geometry = LinearGeometry::new(50.0, 400.0).with_overscan(5);
/// let range = compute_visible_range(2000.0, &geometry, 1000);
/// assert_eq!((range.start, range.end), (35, 53));
/// assert_eq!(range.offset, 1750.0);
/// assert_eq!(range.total_extent, 50_000.0);
/// ```
#[must_use]
pub fn compute_visible_range<S: Scalar>(
    scroll_offset: S,
    geometry: &LinearGeometry<S>,
    len: usize,
) -> VisibleRange<S> {
    if len == 0 || !geometry.has_usable_item_extent() {
        return VisibleRange::empty();
    }
    let item_extent = geometry.item_extent;
    let scroll = scroll_offset.finite_non_negative();
    let container = geometry.container_extent.finite_non_negative();

    let first_visible = (scroll / item_extent).floor_to_usize();
    let start = first_visible.saturating_sub(geometry.overscan).min(len);

    let per_viewport = (container / item_extent).ceil_to_usize();
    let end = start
        .saturating_add(per_viewport)
        .saturating_add(geometry.overscan.saturating_mul(2));
    let visible_end = ((scroll + container) / item_extent).ceil_to_usize();
    let end = end.max(visible_end).min(len);

    log::trace!("visible range {start}..{end} of {len} at scroll {scroll:?}");

    VisibleRange {
        start,
        end,
        offset: geometry.offset_of(start),
        total_extent: geometry.total_extent(len),
    }
}
