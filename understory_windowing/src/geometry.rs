// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry configuration for linear and grid windows.
//!
//! Geometry is resolved once at construction (or on an explicit
//! `set_geometry` call). The window math never fails: zero, negative, or
//! non-finite values are clamped to safe minimums instead. Hosts that want to
//! catch misconfiguration early can call [`LinearGeometry::validate`] or
//! [`GridGeometry::validate`].

use core::fmt;

use kurbo::Size;

use crate::Scalar;

/// Default number of extra items realized on each side of a linear viewport.
pub const DEFAULT_OVERSCAN: usize = 5;

/// A geometry value that the window math had to clamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// An extent that must be strictly positive was zero, negative, or not finite.
    NonPositiveExtent {
        /// Name of the offending field.
        field: &'static str,
    },
    /// An extent or gap that must be non-negative was negative or not finite.
    NegativeExtent {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The container cross extent is narrower than a single grid cell.
    ///
    /// The grid still lays out one column per row in this case.
    NoColumnsFit,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveExtent { field } => {
                write!(f, "`{field}` must be finite and greater than zero")
            }
            Self::NegativeExtent { field } => {
                write!(f, "`{field}` must be finite and non-negative")
            }
            Self::NoColumnsFit => f.write_str(
                "container cross extent is narrower than one cell; clamped to one column",
            ),
        }
    }
}

impl core::error::Error for GeometryError {}

fn check_positive<S: Scalar>(value: S, field: &'static str) -> Result<(), GeometryError> {
    if value.is_finite() && value > S::zero() {
        Ok(())
    } else {
        Err(GeometryError::NonPositiveExtent { field })
    }
}

fn check_non_negative<S: Scalar>(value: S, field: &'static str) -> Result<(), GeometryError> {
    if value.is_finite() && value >= S::zero() {
        Ok(())
    } else {
        Err(GeometryError::NegativeExtent { field })
    }
}

/// Geometry of a uniformly sized 1D strip (list or table body).
///
/// All items share one extent along the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGeometry<S: Scalar = f64> {
    /// Extent of every item along the scroll axis.
    pub item_extent: S,
    /// Extent of the visible viewport along the scroll axis.
    pub container_extent: S,
    /// Extra items realized before and after the visible range.
    pub overscan: usize,
}

impl<S: Scalar> LinearGeometry<S> {
    /// Creates a geometry with [`DEFAULT_OVERSCAN`] items of overscan.
    #[must_use]
    pub fn new(item_extent: S, container_extent: S) -> Self {
        Self {
            item_extent,
            container_extent,
            overscan: DEFAULT_OVERSCAN,
        }
    }

    /// Returns a copy with the given overscan.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Returns a copy with the given container extent.
    #[must_use]
    pub fn with_container_extent(mut self, container_extent: S) -> Self {
        self.container_extent = container_extent;
        self
    }

    /// Reports the first value the window math would have to clamp.
    pub fn validate(&self) -> Result<(), GeometryError> {
        check_positive(self.item_extent, "item_extent")?;
        check_non_negative(self.container_extent, "container_extent")
    }

    /// Returns `true` when the item extent can be divided by.
    pub(crate) fn has_usable_item_extent(&self) -> bool {
        self.item_extent.is_finite() && self.item_extent > S::zero()
    }

    /// Total extent of `len` items, or zero for an unusable item extent.
    #[must_use]
    pub fn total_extent(&self, len: usize) -> S {
        if self.has_usable_item_extent() {
            self.item_extent * S::from_usize(len)
        } else {
            S::zero()
        }
    }

    /// Offset of the leading edge of `index`.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> S {
        if self.has_usable_item_extent() {
            self.item_extent * S::from_usize(index)
        } else {
            S::zero()
        }
    }

    /// Index of the item covering `offset`, if any.
    ///
    /// Returns `None` for offsets past the end of the strip, for negative
    /// offsets, and for an unusable item extent.
    #[must_use]
    pub fn index_at_offset(&self, offset: S, len: usize) -> Option<usize> {
        if !self.has_usable_item_extent() || !offset.is_finite() || offset < S::zero() {
            return None;
        }
        let index = (offset / self.item_extent).floor_to_usize();
        (index < len).then_some(index)
    }
}

/// Geometry of a uniformly sized grid scrolled along the vertical axis.
///
/// `item_size.height` is the extent along the scroll axis and
/// `item_size.width` the cross-axis extent used to derive the column count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    /// Size of every cell.
    pub item_size: Size,
    /// Size of the visible viewport.
    pub container_size: Size,
    /// Gap between adjacent cells, applied on both axes.
    pub gap: f64,
    /// Extra rows realized before and after the visible rows.
    pub overscan_rows: usize,
}

impl GridGeometry {
    /// Creates a grid geometry with no gap and no row overscan.
    #[must_use]
    pub fn new(item_size: Size, container_size: Size) -> Self {
        Self {
            item_size,
            container_size,
            gap: 0.0,
            overscan_rows: 0,
        }
    }

    /// Returns a copy with the given gap.
    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Returns a copy with the given row overscan.
    #[must_use]
    pub fn with_overscan_rows(mut self, overscan_rows: usize) -> Self {
        self.overscan_rows = overscan_rows;
        self
    }

    /// Reports the first value the grid math would have to clamp.
    pub fn validate(&self) -> Result<(), GeometryError> {
        check_positive(self.item_size.height, "item_size.height")?;
        check_positive(self.item_size.width, "item_size.width")?;
        check_non_negative(self.container_size.height, "container_size.height")?;
        check_non_negative(self.container_size.width, "container_size.width")?;
        check_non_negative(self.gap, "gap")?;
        if self.container_size.width < self.item_size.width {
            return Err(GeometryError::NoColumnsFit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::{DEFAULT_OVERSCAN, GeometryError, GridGeometry, LinearGeometry};

    #[test]
    fn linear_defaults_to_five_items_of_overscan() {
        let geometry = LinearGeometry::new(50.0_f64, 400.0);
        assert_eq!(geometry.overscan, DEFAULT_OVERSCAN);
        assert_eq!(geometry.overscan, 5);
        assert_eq!(geometry.validate(), Ok(()));
    }

    #[test]
    fn linear_validate_reports_degenerate_extents() {
        let zero = LinearGeometry::new(0.0_f32, 400.0);
        assert_eq!(
            zero.validate(),
            Err(GeometryError::NonPositiveExtent {
                field: "item_extent"
            })
        );

        let nan = LinearGeometry::new(f64::NAN, 400.0);
        assert!(nan.validate().is_err());

        let negative_container = LinearGeometry::new(10.0_f64, -1.0);
        assert_eq!(
            negative_container.validate(),
            Err(GeometryError::NegativeExtent {
                field: "container_extent"
            })
        );
    }

    #[test]
    fn linear_offsets_and_hit_testing() {
        let geometry = LinearGeometry::new(20.0_f64, 100.0);
        assert_eq!(geometry.offset_of(3), 60.0);
        assert_eq!(geometry.total_extent(10), 200.0);
        assert_eq!(geometry.index_at_offset(59.9, 10), Some(2));
        assert_eq!(geometry.index_at_offset(60.0, 10), Some(3));
        assert_eq!(geometry.index_at_offset(200.0, 10), None);
        assert_eq!(geometry.index_at_offset(-1.0, 10), None);
    }

    #[test]
    fn unusable_item_extent_collapses_to_zero() {
        let geometry = LinearGeometry::new(-5.0_f64, 100.0);
        assert_eq!(geometry.total_extent(10), 0.0);
        assert_eq!(geometry.offset_of(4), 0.0);
        assert_eq!(geometry.index_at_offset(10.0, 10), None);
    }

    #[test]
    fn grid_validate_flags_narrow_containers() {
        let geometry =
            GridGeometry::new(Size::new(100.0, 100.0), Size::new(60.0, 400.0)).with_gap(10.0);
        assert_eq!(geometry.validate(), Err(GeometryError::NoColumnsFit));

        let ok =
            GridGeometry::new(Size::new(100.0, 100.0), Size::new(430.0, 400.0)).with_gap(10.0);
        assert_eq!(ok.validate(), Ok(()));

        let negative_gap =
            GridGeometry::new(Size::new(100.0, 100.0), Size::new(430.0, 400.0)).with_gap(-2.0);
        assert_eq!(
            negative_gap.validate(),
            Err(GeometryError::NegativeExtent { field: "gap" })
        );
    }

    #[test]
    fn errors_render_the_field_name() {
        let err = GeometryError::NonPositiveExtent {
            field: "item_extent",
        };
        assert_eq!(
            alloc::format!("{err}"),
            "`item_extent` must be finite and greater than zero"
        );
    }
}
