// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear window controller for lists and table bodies.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use crate::{LinearGeometry, Scalar, VisibleRange, compute_visible_range};

/// Alignment used when scrolling an item into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    /// Align the item's leading edge with the viewport start.
    Start,
    /// Align the item's trailing edge with the viewport end.
    End,
    /// Center the item in the viewport.
    Center,
    /// Scroll the minimum distance needed to fully reveal the item.
    #[default]
    Nearest,
}

/// Notification forwarded to a scroll listener after each recomputation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent<S: Scalar = f64> {
    /// Scroll offset after clamping.
    pub offset: S,
    /// Range realized for that offset.
    pub range: VisibleRange<S>,
}

/// Output of [`LinearWindow::render`].
///
/// Hosts size a wrapping element to `total_extent` and translate the realized
/// items by `offset`, so the native scrollbar reflects the full collection.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedWindow<R, S: Scalar = f64> {
    /// Extent of the whole collection.
    pub total_extent: S,
    /// Translation applied to the first realized item.
    pub offset: S,
    /// Absolute index of the first realized item.
    pub start: usize,
    /// Rendered items, in collection order.
    pub items: Vec<R>,
}

impl<R, S: Scalar> RenderedWindow<R, S> {
    /// Absolute indices of the rendered items.
    #[must_use]
    pub fn indices(&self) -> Range<usize> {
        self.start..self.start + self.items.len()
    }
}

type ScrollListener<S> = Box<dyn FnMut(&ScrollEvent<S>)>;

/// Windowing over a strip of uniformly sized items.
///
/// `LinearWindow` owns the scroll offset of one list instance. The item
/// collection itself stays with the host and is borrowed for each call, so
/// the visible range is always a pure projection of the scroll offset, the
/// geometry, and the current collection length.
///
/// ```rust
/// use understory_windowing::{LinearGeometry, LinearWindow};
///
/// let pets: Vec<String> = (0..1000).map(|i| format!("pet {i}")).collect();
/// let mut list = LinearWindow::new(LinearGeometry::new(50.0, 400.0));
///
/// list.on_scroll(2000.0, pets.len());
/// let rendered = list.render(&pets, |pet, index| format!("{index}: {pet}"));
///
/// assert_eq!(rendered.indices(), 35..53);
/// assert_eq!(rendered.offset, 1750.0);
/// assert_eq!(rendered.items[0], "35: pet 35");
/// ```
pub struct LinearWindow<S: Scalar = f64> {
    geometry: LinearGeometry<S>,
    scroll_offset: S,
    scroll_listener: Option<ScrollListener<S>>,
}

impl<S: Scalar> fmt::Debug for LinearWindow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearWindow")
            .field("geometry", &self.geometry)
            .field("scroll_offset", &self.scroll_offset)
            .field("scroll_listener", &self.scroll_listener.is_some())
            .finish()
    }
}

impl<S: Scalar> LinearWindow<S> {
    /// Creates a window scrolled to the start.
    #[must_use]
    pub fn new(geometry: LinearGeometry<S>) -> Self {
        warn_if_invalid(&geometry);
        Self {
            geometry,
            scroll_offset: S::zero(),
            scroll_listener: None,
        }
    }

    /// Returns the current geometry.
    #[must_use]
    pub fn geometry(&self) -> &LinearGeometry<S> {
        &self.geometry
    }

    /// Replaces the geometry, for example after the viewport was resized.
    pub fn set_geometry(&mut self, geometry: LinearGeometry<S>) {
        if self.geometry == geometry {
            return;
        }
        warn_if_invalid(&geometry);
        self.geometry = geometry;
    }

    /// Updates only the viewport extent.
    pub fn set_container_extent(&mut self, container_extent: S) {
        self.set_geometry(self.geometry.with_container_extent(container_extent));
    }

    /// Returns the current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> S {
        self.scroll_offset
    }

    /// Sets the scroll offset without notifying the scroll listener.
    ///
    /// Negative and non-finite offsets are stored as zero.
    pub fn set_scroll_offset(&mut self, offset: S) {
        self.scroll_offset = offset.finite_non_negative();
    }

    /// Installs a listener that receives every [`ScrollEvent`].
    pub fn set_scroll_listener(&mut self, listener: impl FnMut(&ScrollEvent<S>) + 'static) {
        self.scroll_listener = Some(Box::new(listener));
    }

    /// Removes the scroll listener.
    pub fn clear_scroll_listener(&mut self) {
        self.scroll_listener = None;
    }

    /// Handles a scroll event from the host container.
    ///
    /// The offset is stored, the visible range recomputed synchronously, and
    /// the listener (if any) notified before this returns.
    pub fn on_scroll(&mut self, offset: S, len: usize) -> VisibleRange<S> {
        self.set_scroll_offset(offset);
        let range = self.visible_range(len);
        if let Some(listener) = self.scroll_listener.as_mut() {
            listener(&ScrollEvent {
                offset: self.scroll_offset,
                range,
            });
        }
        range
    }

    /// Computes the visible range for a collection of `len` items.
    #[must_use]
    pub fn visible_range(&self, len: usize) -> VisibleRange<S> {
        compute_visible_range(self.scroll_offset, &self.geometry, len)
    }

    /// Renders only the visible items of `items`.
    ///
    /// `render_item` receives each realized item together with its absolute
    /// index in `items`. It is not called at all for an empty collection.
    pub fn render<'a, T, R>(
        &self,
        items: &'a [T],
        mut render_item: impl FnMut(&'a T, usize) -> R,
    ) -> RenderedWindow<R, S> {
        let range = self.visible_range(items.len());
        let rendered = items[range.indices()]
            .iter()
            .zip(range.indices())
            .map(|(item, index)| render_item(item, index))
            .collect();
        RenderedWindow {
            total_extent: range.total_extent,
            offset: range.offset,
            start: range.start,
            items: rendered,
        }
    }

    /// Maps a position inside the viewport to an absolute item index.
    ///
    /// Returns `None` outside the viewport or past the end of the collection.
    #[must_use]
    pub fn index_at_viewport_offset(&self, viewport_offset: S, len: usize) -> Option<usize> {
        let container = self.geometry.container_extent.finite_non_negative();
        if !viewport_offset.is_finite()
            || viewport_offset < S::zero()
            || viewport_offset >= container
        {
            return None;
        }
        self.geometry
            .index_at_offset(self.scroll_offset + viewport_offset, len)
    }

    /// Largest scroll offset that still fills the viewport.
    #[must_use]
    pub fn max_scroll_offset(&self, len: usize) -> S {
        let total = self.geometry.total_extent(len);
        let container = self.geometry.container_extent.finite_non_negative();
        (total - container).clamp_non_negative()
    }

    /// Clamps the stored scroll offset to `0..=max_scroll_offset(len)`.
    pub fn clamp_scroll_offset(&mut self, len: usize) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset(len));
    }

    /// Scrolls so that `index` is visible and returns the new range.
    ///
    /// The listener is notified as for a scroll event. Indices past the end
    /// are clamped to the last item.
    pub fn scroll_to_index(
        &mut self,
        index: usize,
        align: ScrollAlign,
        len: usize,
    ) -> VisibleRange<S> {
        if len == 0 {
            return self.on_scroll(S::zero(), len);
        }
        let index = index.min(len - 1);
        let item_start = self.geometry.offset_of(index);
        let item_extent = self.geometry.item_extent.finite_non_negative();
        let item_end = item_start + item_extent;
        let container = self.geometry.container_extent.finite_non_negative();
        let current = self.scroll_offset;

        let target = match align {
            ScrollAlign::Start => item_start,
            ScrollAlign::End => item_end - container,
            ScrollAlign::Center => item_start - (container - item_extent) / S::from_usize(2),
            ScrollAlign::Nearest => {
                if item_start < current {
                    item_start
                } else if item_end > current + container {
                    item_end - container
                } else {
                    current
                }
            }
        };
        let target = target.clamp_non_negative().min(self.max_scroll_offset(len));
        self.on_scroll(target, len)
    }
}

fn warn_if_invalid<S: Scalar>(geometry: &LinearGeometry<S>) {
    if let Err(err) = geometry.validate() {
        log::warn!("linear window geometry clamped: {err}");
    }
}
