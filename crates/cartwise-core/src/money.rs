//! # Money Module
//!
//! Provides the `Money` type used for prices, subtotals and discounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CART TOTALS MUST BE EXACT FOLDS                                        │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │    Σ subtotal computed twice in a different order can differ            │
//! │                                                                         │
//! │  With integer cents:                                                    │
//! │    total_price == Σ item.subtotal, bit for bit, every time              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartwise_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 3297);
//!
//! let sum: Money = [price, line].into_iter().sum();
//! assert_eq!(sum.cents(), 4396);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction (`subtotal - discount`) never needs a
///   separate type
/// - **Saturating quantity multiply**: cart operations are total, so an
///   absurd quantity pins at `i64::MAX` instead of panicking
/// - **No `Display`**: formatting is the presentation layer's job
///
/// ## Where Money Flows
/// ```text
/// Product.price_cents ──► subtotal(price, qty) ──► CartItem.subtotal ──┐
///                    └──► DiscountPolicy ────────► CartItem.discount ──┤
///                                                                       ▼
///                                          CartState.total_price / total_discount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(2).cents(), i64::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `rate` of this amount, rounded half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, computed in i128 so
    /// large subtotals cannot overflow before the division.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    /// use cartwise_core::types::Rate;
    ///
    /// let subtotal = Money::from_cents(1005);
    /// // 10% of 10.05 = 1.005 → 1.01
    /// assert_eq!(subtotal.percentage(Rate::from_bps(1000)).cents(), 101);
    /// ```
    pub fn percentage(&self, rate: Rate) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(clamp_to_i64(cents))
    }

    /// Returns `rate` of this amount, rounded toward zero.
    ///
    /// Used where partial units must never be granted (loyalty points).
    pub fn percentage_floor(&self, rate: Rate) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128) / 10000;
        Money::from_cents(clamp_to_i64(cents))
    }
}

fn clamp_to_i64(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

/// Folding a list of amounts (cart aggregates).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
