// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction used by linear window geometry.
//!
//! Rounding helpers are built on truncating casts so the crate stays `no_std`
//! without pulling in `libm`.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Float type used for item extents, viewport extents, and scroll offsets.
///
/// Implemented for `f32` and `f64`.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity (typically `0.0`).
    fn zero() -> Self;

    /// Returns the maximum of `self` and `other`.
    fn max(self, other: Self) -> Self;

    /// Returns the minimum of `self` and `other`.
    fn min(self, other: Self) -> Self;

    /// Returns `true` if the value is finite (not NaN or infinite).
    fn is_finite(self) -> bool;

    /// Returns `true` if the value is negative, including `-0.0`.
    fn is_sign_negative(self) -> bool;

    /// Constructs from a `usize` lossily.
    fn from_usize(value: usize) -> Self;

    /// Truncates the value toward zero and converts it to `isize`.
    ///
    /// Implementations saturate at the `isize` bounds; callers are expected
    /// to clamp the result to a valid index range afterwards.
    fn floor_to_isize(self) -> isize;

    /// Clamps negative values to zero.
    fn clamp_non_negative(self) -> Self {
        if self.is_sign_negative() {
            Self::zero()
        } else {
            self
        }
    }

    /// Maps NaN and infinities to zero and clamps negative values to zero.
    fn finite_non_negative(self) -> Self {
        if self.is_finite() {
            self.clamp_non_negative()
        } else {
            Self::zero()
        }
    }

    /// Rounds a non-negative value down to an index.
    ///
    /// Negative and non-finite values map to `0`.
    fn floor_to_usize(self) -> usize {
        usize::try_from(self.finite_non_negative().floor_to_isize()).unwrap_or(0)
    }

    /// Rounds a non-negative value up to a count.
    ///
    /// Negative and non-finite values map to `0`.
    fn ceil_to_usize(self) -> usize {
        let value = self.finite_non_negative();
        let floor = value.floor_to_usize();
        if Self::from_usize(floor) < value {
            floor.saturating_add(1)
        } else {
            floor
        }
    }
}

macro_rules! impl_scalar {
    ($($ty:ty),*) => {$(
        impl Scalar for $ty {
            fn zero() -> Self {
                0.0
            }

            fn max(self, other: Self) -> Self {
                <$ty>::max(self, other)
            }

            fn min(self, other: Self) -> Self {
                <$ty>::min(self, other)
            }

            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }

            fn is_sign_negative(self) -> bool {
                <$ty>::is_sign_negative(self)
            }

            fn from_usize(value: usize) -> Self {
                value as Self
            }

            #[expect(
                clippy::cast_possible_truncation,
                reason = "`as` saturates and every caller clamps the index to the length"
            )]
            fn floor_to_isize(self) -> isize {
                self as isize
            }
        }
    )*};
}

impl_scalar!(f32, f64);
