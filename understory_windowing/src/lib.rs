// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_windowing --heading-base-level=0

//! Understory Windowing: headless windowed rendering for large collections.
//!
//! This crate computes which items of a large, uniformly sized collection
//! must be materialized for a given scroll position, and where they go. It
//! covers four presentation variants that share one algorithm:
//!
//! - [`compute_visible_range`]: the O(1) window calculator. Given a scroll
//!   offset and a [`LinearGeometry`], it returns a [`VisibleRange`] of
//!   absolute indices, the translation offset of the first one, and the total
//!   extent of the collection.
//! - [`LinearWindow`]: a list controller that owns the scroll offset and
//!   renders only the visible items through a host-supplied closure.
//! - [`TableWindow`]: a fixed header row over a [`LinearWindow`] body, with
//!   shared [`ColumnLayout`]s and row clicks reported by absolute index.
//! - [`GridWindow`]: row-major 2D windowing over a vertical scroll axis, see
//!   [`compute_visible_cells`].
//! - [`IncrementalLoader`]: an infinite-scroll state machine that asks the
//!   host for more items near the end of the content, with at most one load
//!   in flight.
//!
//! This crate deliberately does **not** know about widgets, display trees, or any
//! particular UI framework. Host frameworks are responsible for:
//!
//! - Owning the item collection and lending it for each render.
//! - Forwarding scroll events and viewport size changes.
//! - Sizing a spacer to the reported total extent and translating the
//!   rendered items by the reported offset, so native scrollbars reflect the
//!   full collection.
//! - Running the async load that [`IncrementalLoader`] asks for.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_windowing::{LinearGeometry, LinearWindow};
//!
//! // 1000 items, each 50 logical pixels tall, in a 400px viewport.
//! let items: Vec<u32> = (0..1000).collect();
//! let mut list = LinearWindow::new(LinearGeometry::new(50.0, 400.0));
//!
//! // Scroll to 2000px from the start.
//! let range = list.on_scroll(2000.0, items.len());
//! assert_eq!((range.start, range.end), (35, 53));
//!
//! let rendered = list.render(&items, |item, index| {
//!     assert_eq!(*item as usize, index);
//!     index
//! });
//! assert_eq!(rendered.offset, 1750.0);
//! assert_eq!(rendered.total_extent, 50_000.0);
//! ```
//!
//! Degenerate geometry never panics: zero or negative extents are clamped to
//! safe values and logged at `warn` level through the `log` facade. Use
//! [`LinearGeometry::validate`] or [`GridGeometry::validate`] to reject such
//! configurations up front.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod geometry;
mod grid;
mod linear;
mod loader;
mod range;
mod scalar;
mod table;

pub use geometry::{DEFAULT_OVERSCAN, GeometryError, GridGeometry, LinearGeometry};
pub use grid::{
    GridCell, GridLayout, GridScrollEvent, GridWindow, RenderedGrid, VisibleCells,
    compute_visible_cells,
};
pub use linear::{LinearWindow, RenderedWindow, ScrollAlign, ScrollEvent};
pub use loader::{
    DEFAULT_THRESHOLD, Footer, IncrementalLoader, LoadMore, LoadState, LoadTicket, LoaderConfig,
};
pub use range::{VisibleRange, compute_visible_range};
pub use scalar::Scalar;
pub use table::{ColumnLayout, ColumnSpan, ColumnWidth, TableColumns, TableGeometry, TableWindow};
