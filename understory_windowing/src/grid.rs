// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid windowing: uniformly sized cells laid out row-major and scrolled
//! vertically.
//!
//! The column count is derived from the container width:
//!
//! ```text
//! items_per_row = max(1, floor((container_width + gap) / (item_width + gap)))
//! total_rows    = ceil(len / items_per_row)
//! row_extent    = item_height + gap
//! total_height  = total_rows * row_extent - gap
//! ```
//!
//! Only rows intersecting the viewport (plus one trailing row, plus any
//! configured row overscan) are realized.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use kurbo::{Point, Size};

use crate::{GridGeometry, Scalar};

/// Resolved grid layout for a collection of a given length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Number of cells per row, always at least 1.
    pub items_per_row: usize,
    /// Number of rows needed for the whole collection.
    pub total_rows: usize,
    /// Height of one row including the trailing gap.
    pub row_extent: f64,
    /// Horizontal distance between the left edges of adjacent columns.
    pub column_stride: f64,
    /// Scrollable height of the whole grid.
    pub total_height: f64,
}

impl GridLayout {
    /// Resolves the layout of `len` cells.
    ///
    /// An unusable cell height (zero, negative, or not finite) resolves to a
    /// layout with no rows.
    #[must_use]
    pub fn new(geometry: &GridGeometry, len: usize) -> Self {
        let gap = geometry.gap.finite_non_negative();
        let items_per_row = items_per_row(geometry);
        let column_stride = geometry.item_size.width.finite_non_negative() + gap;
        let item_height = geometry.item_size.height;
        if !item_height.is_finite() || item_height <= 0.0 {
            return Self {
                items_per_row,
                total_rows: 0,
                row_extent: 0.0,
                column_stride,
                total_height: 0.0,
            };
        }
        let row_extent = item_height + gap;
        let total_rows = len.div_ceil(items_per_row);
        let total_height = if total_rows == 0 {
            0.0
        } else {
            row_extent * f64::from_usize(total_rows) - gap
        };
        Self {
            items_per_row,
            total_rows,
            row_extent,
            column_stride,
            total_height,
        }
    }

    /// Row and column of a flat index.
    #[must_use]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.items_per_row, index % self.items_per_row)
    }

    /// Top-left corner of the cell at `index`, in content coordinates.
    #[must_use]
    pub fn cell_origin(&self, index: usize) -> Point {
        let (row, col) = self.row_col(index);
        Point::new(
            f64::from_usize(col) * self.column_stride,
            f64::from_usize(row) * self.row_extent,
        )
    }
}

/// Column count for a geometry, clamped to at least one column.
fn items_per_row(geometry: &GridGeometry) -> usize {
    let gap = geometry.gap.finite_non_negative();
    let stride = geometry.item_size.width.finite_non_negative() + gap;
    if stride <= 0.0 {
        return 1;
    }
    let available = geometry.container_size.width.finite_non_negative() + gap;
    (available / stride).floor_to_usize().max(1)
}

/// A realized grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    /// Absolute index into the host collection.
    pub index: usize,
    /// Top-left corner in content coordinates.
    pub origin: Point,
}

/// Cells of a grid that should be realized.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleCells {
    /// Realized cells in row-major order.
    pub cells: Vec<GridCell>,
    /// Realized rows (half-open).
    pub rows: Range<usize>,
    /// Top edge of the first realized row.
    pub offset_y: f64,
    /// Scrollable height of the whole grid.
    pub total_height: f64,
}

impl VisibleCells {
    /// Returns `true` if no cell needs to be realized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Computes the cells of a grid of `len` items to realize at `scroll_offset`.
///
/// ```rust
/// use kurbo::Size;
/// use understory_windowing::{GridGeometry, compute_visible_cells};
///
/// let geometry = GridGeometry::new(Size::new(100.0, 100.0), Size::new(430.0, 400.0))
///     .with_gap(10.0);
/// let visible = compute_visible_cells(250.0, &geometry, 97);
///
/// assert_eq!(visible.rows, 2..7);
/// assert_eq!(visible.cells.first().map(|c| c.index), Some(8));
/// assert_eq!(visible.total_height, 2740.0);
/// ```
#[must_use]
pub fn compute_visible_cells(
    scroll_offset: f64,
    geometry: &GridGeometry,
    len: usize,
) -> VisibleCells {
    let layout = GridLayout::new(geometry, len);
    if layout.total_rows == 0 {
        return VisibleCells {
            cells: Vec::new(),
            rows: 0..0,
            offset_y: 0.0,
            total_height: layout.total_height,
        };
    }

    let scroll = scroll_offset.finite_non_negative();
    let container = geometry.container_size.height.finite_non_negative();
    let overscan = geometry.overscan_rows;

    let first_row = (scroll / layout.row_extent).floor_to_usize();
    let start_row = first_row.saturating_sub(overscan).min(layout.total_rows);
    let per_viewport = (container / layout.row_extent).ceil_to_usize();
    let end_row = first_row
        .saturating_add(per_viewport)
        .saturating_add(1)
        .saturating_add(overscan)
        .min(layout.total_rows)
        .max(start_row);

    let start_index = start_row * layout.items_per_row;
    let end_index = (end_row * layout.items_per_row).min(len);
    let cells = (start_index..end_index)
        .map(|index| GridCell {
            index,
            origin: layout.cell_origin(index),
        })
        .collect();

    log::trace!("visible rows {start_row}..{end_row} of {}", layout.total_rows);

    VisibleCells {
        cells,
        rows: start_row..end_row,
        offset_y: f64::from_usize(start_row) * layout.row_extent,
        total_height: layout.total_height,
    }
}

/// Notification forwarded to a grid scroll listener.
#[derive(Clone, Debug, PartialEq)]
pub struct GridScrollEvent {
    /// Scroll offset after clamping.
    pub offset: f64,
    /// Rows realized for that offset.
    pub rows: Range<usize>,
}

/// Output of [`GridWindow::render`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedGrid<R> {
    /// Scrollable height of the whole grid.
    pub total_height: f64,
    /// Top edge of the first realized row.
    pub offset_y: f64,
    /// Rendered cells in row-major order.
    pub items: Vec<R>,
}

type GridScrollListener = Box<dyn FnMut(&GridScrollEvent)>;

/// Windowing over a vertically scrolled grid of uniformly sized cells.
///
/// Resizing the container recomputes the column count right away. When the
/// column count changes, the scroll offset is re-anchored so that the first
/// visible item stays in the first visible row.
pub struct GridWindow {
    geometry: GridGeometry,
    scroll_offset: f64,
    scroll_listener: Option<GridScrollListener>,
}

impl fmt::Debug for GridWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridWindow")
            .field("geometry", &self.geometry)
            .field("scroll_offset", &self.scroll_offset)
            .field("scroll_listener", &self.scroll_listener.is_some())
            .finish()
    }
}

impl GridWindow {
    /// Creates a grid window scrolled to the top.
    #[must_use]
    pub fn new(geometry: GridGeometry) -> Self {
        warn_if_invalid(&geometry);
        Self {
            geometry,
            scroll_offset: 0.0,
            scroll_listener: None,
        }
    }

    /// Returns the current geometry.
    #[must_use]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Replaces the geometry, re-anchoring the scroll offset if the column
    /// count changes.
    ///
    /// Fewer rows can leave the re-anchored offset past the new end of the
    /// grid. Call [`GridWindow::clamp_scroll_offset`] afterwards, or use
    /// [`GridWindow::set_container_size`] which does both.
    pub fn set_geometry(&mut self, geometry: GridGeometry) {
        if self.geometry == geometry {
            return;
        }
        warn_if_invalid(&geometry);
        let old = GridLayout::new(&self.geometry, 0);
        let new = GridLayout::new(&geometry, 0);
        if old.items_per_row != new.items_per_row && old.row_extent > 0.0 && new.row_extent > 0.0 {
            let first_row = (self.scroll_offset / old.row_extent).floor_to_usize();
            let within_row = self.scroll_offset - f64::from_usize(first_row) * old.row_extent;
            let anchor = first_row * old.items_per_row;
            let new_row = anchor / new.items_per_row;
            self.scroll_offset = f64::from_usize(new_row) * new.row_extent
                + within_row.min(new.row_extent);
            log::debug!(
                "grid columns {} -> {}, anchored item {anchor} to row {new_row}",
                old.items_per_row,
                new.items_per_row
            );
        }
        self.geometry = geometry;
    }

    /// Updates the container size, as on a resize observation, for a grid
    /// of `len` cells.
    ///
    /// The re-anchored scroll offset is clamped to the new
    /// [`max_scroll_offset`](GridWindow::max_scroll_offset).
    pub fn set_container_size(&mut self, container_size: Size, len: usize) {
        self.set_geometry(GridGeometry {
            container_size,
            ..self.geometry
        });
        self.clamp_scroll_offset(len);
    }

    /// Resolves the layout for `len` cells.
    #[must_use]
    pub fn layout(&self, len: usize) -> GridLayout {
        GridLayout::new(&self.geometry, len)
    }

    /// Returns the current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Sets the scroll offset without notifying the scroll listener.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset.finite_non_negative();
    }

    /// Installs a listener that receives every [`GridScrollEvent`].
    pub fn set_scroll_listener(&mut self, listener: impl FnMut(&GridScrollEvent) + 'static) {
        self.scroll_listener = Some(Box::new(listener));
    }

    /// Removes the scroll listener.
    pub fn clear_scroll_listener(&mut self) {
        self.scroll_listener = None;
    }

    /// Handles a scroll event and returns the cells to realize.
    pub fn on_scroll(&mut self, offset: f64, len: usize) -> VisibleCells {
        self.set_scroll_offset(offset);
        let visible = self.visible_cells(len);
        if let Some(listener) = self.scroll_listener.as_mut() {
            listener(&GridScrollEvent {
                offset: self.scroll_offset,
                rows: visible.rows.clone(),
            });
        }
        visible
    }

    /// Computes the cells to realize for a collection of `len` items.
    #[must_use]
    pub fn visible_cells(&self, len: usize) -> VisibleCells {
        compute_visible_cells(self.scroll_offset, &self.geometry, len)
    }

    /// Renders only the visible cells of `items`.
    ///
    /// `render_cell` receives the item, its absolute index, and its origin in
    /// content coordinates.
    pub fn render<'a, T, R>(
        &self,
        items: &'a [T],
        mut render_cell: impl FnMut(&'a T, usize, Point) -> R,
    ) -> RenderedGrid<R> {
        let visible = self.visible_cells(items.len());
        let rendered = visible
            .cells
            .iter()
            .map(|cell| render_cell(&items[cell.index], cell.index, cell.origin))
            .collect();
        RenderedGrid {
            total_height: visible.total_height,
            offset_y: visible.offset_y,
            items: rendered,
        }
    }

    /// Maps a point inside the viewport to the absolute index of the cell
    /// under it.
    ///
    /// Points in a gap, outside the viewport, or past the last cell yield
    /// `None`.
    #[must_use]
    pub fn cell_at(&self, viewport_point: Point, len: usize) -> Option<usize> {
        let container = self.geometry.container_size;
        let inside = (0.0..container.width).contains(&viewport_point.x)
            && (0.0..container.height).contains(&viewport_point.y);
        if !inside {
            return None;
        }
        let layout = self.layout(len);
        if layout.total_rows == 0 || layout.column_stride <= 0.0 {
            return None;
        }
        let y = self.scroll_offset + viewport_point.y;
        let row = (y / layout.row_extent).floor_to_usize();
        if y - f64::from_usize(row) * layout.row_extent >= self.geometry.item_size.height {
            return None;
        }
        let col = (viewport_point.x / layout.column_stride).floor_to_usize();
        if col >= layout.items_per_row
            || viewport_point.x - f64::from_usize(col) * layout.column_stride
                >= self.geometry.item_size.width
        {
            return None;
        }
        let index = row * layout.items_per_row + col;
        (index < len).then_some(index)
    }

    /// Largest scroll offset that still fills the viewport.
    #[must_use]
    pub fn max_scroll_offset(&self, len: usize) -> f64 {
        let height = self.geometry.container_size.height.finite_non_negative();
        (self.layout(len).total_height - height).max(0.0)
    }

    /// Clamps the stored scroll offset to `0..=max_scroll_offset(len)`.
    pub fn clamp_scroll_offset(&mut self, len: usize) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset(len));
    }
}

fn warn_if_invalid(geometry: &GridGeometry) {
    if let Err(err) = geometry.validate() {
        log::warn!("grid window geometry clamped: {err}");
    }
}
