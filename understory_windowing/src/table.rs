// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table windowing: a fixed header row over a virtualized row body.
//!
//! Header and body share one [`ColumnLayout`], so header cells always line up
//! with body cells. Only the body is windowed; the header is rendered in full
//! every time.
//!
//! ```rust
//! use kurbo::Size;
//! use understory_windowing::{ColumnWidth, TableColumns, TableGeometry, TableWindow};
//!
//! let columns = TableColumns::new([ColumnWidth::Fixed(120.0), ColumnWidth::Fill(1.0)]);
//! let geometry = TableGeometry::new(32.0, 40.0, Size::new(600.0, 360.0));
//! let mut table = TableWindow::new(columns, geometry);
//!
//! let rows: Vec<(&str, &str)> = vec![("Biscuit", "dog"); 500];
//! table.on_scroll(640.0, rows.len());
//!
//! let mut clicked = None;
//! // A click 50px below the table top lands in the body, under the header.
//! table.click_row(&rows, 50.0, |_, index| clicked = Some(index));
//! assert_eq!(clicked, Some(20));
//! ```

use kurbo::{Rect, Size};
use smallvec::SmallVec;

use crate::{
    DEFAULT_OVERSCAN, LinearGeometry, LinearWindow, RenderedWindow, Scalar, VisibleRange,
};

/// How a column claims horizontal space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnWidth {
    /// A fixed width in logical pixels.
    Fixed(f64),
    /// A share of the width left over after fixed columns, by weight.
    Fill(f64),
}

/// Column width specifications for a table.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TableColumns {
    widths: SmallVec<[ColumnWidth; 8]>,
}

impl TableColumns {
    /// Creates a column set from width specifications, in display order.
    #[must_use]
    pub fn new(widths: impl IntoIterator<Item = ColumnWidth>) -> Self {
        Self {
            widths: widths.into_iter().collect(),
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Returns `true` if there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Width specifications in display order.
    #[must_use]
    pub fn widths(&self) -> &[ColumnWidth] {
        &self.widths
    }

    /// Resolves column positions for a table `available_width` wide.
    ///
    /// Fixed columns keep their width even if they overflow; fill columns
    /// share whatever is left, in proportion to their weights. Negative or
    /// non-finite widths and weights count as zero.
    #[must_use]
    pub fn resolve(&self, available_width: f64) -> ColumnLayout {
        let mut fixed_total = 0.0;
        let mut weight_total = 0.0;
        for width in &self.widths {
            match *width {
                ColumnWidth::Fixed(px) => fixed_total += px.finite_non_negative(),
                ColumnWidth::Fill(weight) => weight_total += weight.finite_non_negative(),
            }
        }
        let remaining = (available_width.finite_non_negative() - fixed_total).max(0.0);

        let mut x = 0.0;
        let spans = self
            .widths
            .iter()
            .map(|width| {
                let width = match *width {
                    ColumnWidth::Fixed(px) => px.finite_non_negative(),
                    ColumnWidth::Fill(weight) if weight_total > 0.0 => {
                        remaining * weight.finite_non_negative() / weight_total
                    }
                    ColumnWidth::Fill(_) => 0.0,
                };
                let span = ColumnSpan { x, width };
                x += width;
                span
            })
            .collect();
        ColumnLayout {
            spans,
            total_width: x,
        }
    }
}

/// Horizontal placement of one resolved column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSpan {
    /// Left edge.
    pub x: f64,
    /// Width.
    pub width: f64,
}

/// Resolved column positions shared by header and body.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ColumnLayout {
    spans: SmallVec<[ColumnSpan; 8]>,
    total_width: f64,
}

impl ColumnLayout {
    /// Resolved columns in display order.
    #[must_use]
    pub fn spans(&self) -> &[ColumnSpan] {
        &self.spans
    }

    /// Sum of all column widths.
    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.total_width
    }

    /// Index of the column under `x`, if any.
    #[must_use]
    pub fn column_at(&self, x: f64) -> Option<usize> {
        self.spans
            .iter()
            .position(|span| x >= span.x && x < span.x + span.width)
    }

    /// Cell rectangles for a band spanning `y0..y1`.
    pub fn cells(&self, y0: f64, y1: f64) -> impl Iterator<Item = Rect> + '_ {
        self.spans
            .iter()
            .map(move |span| Rect::new(span.x, y0, span.x + span.width, y1))
    }
}

/// Geometry of a table viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableGeometry {
    /// Height of every body row.
    pub row_height: f64,
    /// Height of the fixed header row.
    pub header_height: f64,
    /// Size of the whole table viewport, header included.
    pub container_size: Size,
    /// Extra body rows realized above and below the visible rows.
    pub overscan: usize,
}

impl TableGeometry {
    /// Creates a table geometry with the default row overscan.
    #[must_use]
    pub fn new(row_height: f64, header_height: f64, container_size: Size) -> Self {
        Self {
            row_height,
            header_height,
            container_size,
            overscan: DEFAULT_OVERSCAN,
        }
    }

    /// Returns a copy with the given row overscan.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    fn header_height(&self) -> f64 {
        self.header_height.finite_non_negative()
    }

    fn body_geometry(&self) -> LinearGeometry<f64> {
        let body_height =
            (self.container_size.height.finite_non_negative() - self.header_height()).max(0.0);
        LinearGeometry::new(self.row_height, body_height).with_overscan(self.overscan)
    }
}

/// A table with a fixed header row and a windowed body.
///
/// Row indices reported to callbacks are always absolute indices into the
/// host's row slice.
#[derive(Debug)]
pub struct TableWindow {
    columns: TableColumns,
    layout: ColumnLayout,
    geometry: TableGeometry,
    body: LinearWindow<f64>,
}

impl TableWindow {
    /// Creates a table scrolled to the first row.
    #[must_use]
    pub fn new(columns: TableColumns, geometry: TableGeometry) -> Self {
        let layout = columns.resolve(geometry.container_size.width);
        Self {
            columns,
            layout,
            body: LinearWindow::new(geometry.body_geometry()),
            geometry,
        }
    }

    /// Column specifications.
    #[must_use]
    pub fn columns(&self) -> &TableColumns {
        &self.columns
    }

    /// Replaces the columns and re-resolves their layout.
    pub fn set_columns(&mut self, columns: TableColumns) {
        self.layout = columns.resolve(self.geometry.container_size.width);
        self.columns = columns;
    }

    /// Resolved column positions.
    #[must_use]
    pub fn column_layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Current geometry.
    #[must_use]
    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    /// Replaces the geometry, re-resolving columns and the body viewport.
    pub fn set_geometry(&mut self, geometry: TableGeometry) {
        if geometry.container_size.width != self.geometry.container_size.width {
            self.layout = self.columns.resolve(geometry.container_size.width);
        }
        self.body.set_geometry(geometry.body_geometry());
        self.geometry = geometry;
    }

    /// Updates the viewport size, as on a resize observation.
    pub fn set_container_size(&mut self, container_size: Size) {
        self.set_geometry(TableGeometry {
            container_size,
            ..self.geometry
        });
    }

    /// The windowed body.
    #[must_use]
    pub fn body(&self) -> &LinearWindow<f64> {
        &self.body
    }

    /// The windowed body, mutably (for example to install a scroll listener).
    pub fn body_mut(&mut self) -> &mut LinearWindow<f64> {
        &mut self.body
    }

    /// Header cell rectangles, in table coordinates.
    pub fn header_cells(&self) -> impl Iterator<Item = Rect> + '_ {
        self.layout.cells(0.0, self.geometry.header_height())
    }

    /// Cell rectangles of the body row `index`, in body content coordinates.
    pub fn row_cells(&self, index: usize) -> impl Iterator<Item = Rect> + '_ {
        let top = self.body.geometry().offset_of(index);
        self.layout.cells(top, top + self.geometry.row_height.finite_non_negative())
    }

    /// Handles a scroll event of the body.
    pub fn on_scroll(&mut self, offset: f64, len: usize) -> VisibleRange<f64> {
        self.body.on_scroll(offset, len)
    }

    /// Renders the visible body rows.
    ///
    /// `render_row` receives the row, its absolute index, and the shared
    /// column layout.
    pub fn render_rows<'a, T, R>(
        &self,
        rows: &'a [T],
        mut render_row: impl FnMut(&'a T, usize, &ColumnLayout) -> R,
    ) -> RenderedWindow<R, f64> {
        self.body
            .render(rows, |row, index| render_row(row, index, &self.layout))
    }

    /// Dispatches a click at `viewport_y` (measured from the table top).
    ///
    /// Clicks on the header, or below the last row, are ignored. Otherwise
    /// `on_click` runs with the row and its absolute index, which is also
    /// returned.
    pub fn click_row<T>(
        &self,
        rows: &[T],
        viewport_y: f64,
        on_click: impl FnOnce(&T, usize),
    ) -> Option<usize> {
        let header = self.geometry.header_height();
        if viewport_y.is_nan() || viewport_y < header {
            return None;
        }
        let index = self
            .body
            .index_at_viewport_offset(viewport_y - header, rows.len())?;
        on_click(&rows[index], index);
        Some(index)
    }
}
