//! # Pricing Rules
//!
//! Per-item pricing: subtotal, discount and loyalty points.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Item Pricing (per transition)                        │
//! │                                                                         │
//! │   (price, quantity)                                                     │
//! │         │                                                               │
//! │         ├──► subtotal(price, qty)          = price × qty                │
//! │         │                                                               │
//! │         ├──► DiscountPolicy::discount()    e.g. 10% when qty ≥ 10       │
//! │         │                                                               │
//! │         └──► PointsPolicy::points()        e.g. 1% of subtotal          │
//! │                                                                         │
//! │   The policies see ONLY price and quantity, never the cart, so an       │
//! │   item is priced identically whether it came from add or update.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartwise_core::pricing::{PricingRules, QuantityThresholdDiscount, SubtotalRatioPoints};
//! use cartwise_core::types::{Product, Rate};
//!
//! let rules = PricingRules::new(
//!     QuantityThresholdDiscount::new(5, Rate::from_percent(20)),
//!     SubtotalRatioPoints::new(Rate::from_percent(1)),
//! );
//!
//! let item = rules.price_item(Product::new("A", 1000), 5);
//! assert_eq!(item.subtotal.cents(), 5000);
//! assert_eq!(item.discount.cents(), 1000);
//! assert_eq!(item.points, 50);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::cart::CartItem;
use crate::money::Money;
use crate::types::{Product, Rate};

/// Quantity at which the default discount kicks in.
pub const DEFAULT_DISCOUNT_MIN_QUANTITY: i64 = 10;

/// Default bulk discount: 10%.
pub const DEFAULT_DISCOUNT_RATE_BPS: u32 = 1000;

/// Default points accrual: 1% of the subtotal.
pub const DEFAULT_POINTS_RATE_BPS: u32 = 100;

// =============================================================================
// Subtotal
// =============================================================================

/// Line subtotal before discount: `price × quantity`.
#[inline]
pub fn subtotal(price: Money, quantity: i64) -> Money {
    price.multiply_quantity(quantity)
}

// =============================================================================
// Discount Policies
// =============================================================================

/// Decides the discount granted on one cart line.
pub trait DiscountPolicy: fmt::Debug + Send + Sync {
    /// Returns the discount amount for `quantity` units at `price`.
    fn discount(&self, price: Money, quantity: i64) -> Money;
}

/// Never discounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDiscount;

impl DiscountPolicy for NoDiscount {
    fn discount(&self, _price: Money, _quantity: i64) -> Money {
        Money::zero()
    }
}

/// Bulk discount: `rate` of the subtotal once `quantity >= min_quantity`.
///
/// ```text
///  qty:       1 ... min_quantity-1 │ min_quantity ...
///  discount:  0                    │ subtotal × rate (half-up)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityThresholdDiscount {
    min_quantity: i64,
    rate: Rate,
}

impl QuantityThresholdDiscount {
    /// Creates a threshold discount.
    pub const fn new(min_quantity: i64, rate: Rate) -> Self {
        QuantityThresholdDiscount { min_quantity, rate }
    }

    /// Quantity needed before the discount applies.
    pub const fn min_quantity(&self) -> i64 {
        self.min_quantity
    }

    /// Share of the subtotal taken off.
    pub const fn rate(&self) -> Rate {
        self.rate
    }
}

impl Default for QuantityThresholdDiscount {
    fn default() -> Self {
        QuantityThresholdDiscount::new(
            DEFAULT_DISCOUNT_MIN_QUANTITY,
            Rate::from_bps(DEFAULT_DISCOUNT_RATE_BPS),
        )
    }
}

impl DiscountPolicy for QuantityThresholdDiscount {
    fn discount(&self, price: Money, quantity: i64) -> Money {
        if quantity <= 0 || quantity < self.min_quantity {
            return Money::zero();
        }
        subtotal(price, quantity).percentage(self.rate)
    }
}

// =============================================================================
// Points Policies
// =============================================================================

/// Decides the loyalty points earned by one cart line.
pub trait PointsPolicy: fmt::Debug + Send + Sync {
    /// Returns the points earned for `quantity` units at `price`.
    fn points(&self, price: Money, quantity: i64) -> i64;
}

/// Never earns points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPoints;

impl PointsPolicy for NoPoints {
    fn points(&self, _price: Money, _quantity: i64) -> i64 {
        0
    }
}

/// One point per cent of `rate × subtotal`, rounded down.
///
/// Partial points are never granted, and a non-positive subtotal earns none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtotalRatioPoints {
    rate: Rate,
}

impl SubtotalRatioPoints {
    /// Creates a ratio points policy.
    pub const fn new(rate: Rate) -> Self {
        SubtotalRatioPoints { rate }
    }

    /// Share of the subtotal converted to points.
    pub const fn rate(&self) -> Rate {
        self.rate
    }
}

impl Default for SubtotalRatioPoints {
    fn default() -> Self {
        SubtotalRatioPoints::new(Rate::from_bps(DEFAULT_POINTS_RATE_BPS))
    }
}

impl PointsPolicy for SubtotalRatioPoints {
    fn points(&self, price: Money, quantity: i64) -> i64 {
        let line = subtotal(price, quantity);
        if !line.is_positive() {
            return 0;
        }
        line.percentage_floor(self.rate).cents()
    }
}

// =============================================================================
// Pricing Rules
// =============================================================================

/// The pair of policies used to price every cart line.
///
/// Cloning is cheap: policies are shared behind `Arc`.
#[derive(Debug, Clone)]
pub struct PricingRules {
    discount: Arc<dyn DiscountPolicy>,
    points: Arc<dyn PointsPolicy>,
}

impl PricingRules {
    /// Creates rules from a discount and a points policy.
    pub fn new<D, P>(discount: D, points: P) -> Self
    where
        D: DiscountPolicy + 'static,
        P: PointsPolicy + 'static,
    {
        PricingRules {
            discount: Arc::new(discount),
            points: Arc::new(points),
        }
    }

    /// Rules with no discount and no points: items cost exactly their subtotal.
    pub fn flat() -> Self {
        PricingRules::new(NoDiscount, NoPoints)
    }

    /// Replaces the discount policy.
    pub fn with_discount<D: DiscountPolicy + 'static>(mut self, discount: D) -> Self {
        self.discount = Arc::new(discount);
        self
    }

    /// Replaces the points policy.
    pub fn with_points<P: PointsPolicy + 'static>(mut self, points: P) -> Self {
        self.points = Arc::new(points);
        self
    }

    /// Discount for `quantity` units at `price`.
    pub fn discount(&self, price: Money, quantity: i64) -> Money {
        self.discount.discount(price, quantity)
    }

    /// Points for `quantity` units at `price`.
    pub fn points(&self, price: Money, quantity: i64) -> i64 {
        self.points.points(price, quantity)
    }

    /// Builds a fully priced cart line.
    ///
    /// Callers are responsible for keeping `quantity > 0` for lines that stay
    /// in a cart; the reducer drops lines that reach zero.
    pub fn price_item(&self, product: Product, quantity: i64) -> CartItem {
        let price = product.price();
        CartItem {
            subtotal: subtotal(price, quantity),
            discount: self.discount(price, quantity),
            points: self.points(price, quantity),
            product,
            quantity,
        }
    }
}

impl Default for PricingRules {
    /// 10% off at 10+ units, 1% of the subtotal back as points.
    fn default() -> Self {
        PricingRules::new(
            QuantityThresholdDiscount::default(),
            SubtotalRatioPoints::default(),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtotal() {
        assert_eq!(subtotal(Money::from_cents(100), 2).cents(), 200);
        assert_eq!(subtotal(Money::from_cents(100), 0).cents(), 0);
    }

    #[test]
    fn test_threshold_discount_below_and_at_threshold() {
        let policy = QuantityThresholdDiscount::new(10, Rate::from_percent(10));
        let price = Money::from_cents(1000);

        assert!(policy.discount(price, 9).is_zero());
        assert_eq!(policy.discount(price, 10).cents(), 1000);
        assert_eq!(policy.discount(price, 15).cents(), 1500);
    }

    #[test]
    fn test_threshold_discount_ignores_non_positive_quantity() {
        let policy = QuantityThresholdDiscount::new(0, Rate::from_percent(50));
        assert!(policy.discount(Money::from_cents(1000), 0).is_zero());
        assert!(policy.discount(Money::from_cents(1000), -3).is_zero());
    }

    #[test]
    fn test_ratio_points_round_down() {
        let policy = SubtotalRatioPoints::new(Rate::from_percent(1));
        assert_eq!(policy.points(Money::from_cents(100), 2), 2);
        assert_eq!(policy.points(Money::from_cents(199), 1), 1);
        assert_eq!(policy.points(Money::from_cents(50), 1), 0);
        assert_eq!(policy.points(Money::from_cents(100), 0), 0);
    }

    #[test]
    fn test_flat_rules() {
        let rules = PricingRules::flat();
        let item = rules.price_item(Product::new("A", 100), 50);
        assert_eq!(item.subtotal.cents(), 5000);
        assert!(item.discount.is_zero());
        assert_eq!(item.points, 0);
    }

    #[test]
    fn test_default_rules() {
        let rules = PricingRules::default();

        let small = rules.price_item(Product::new("A", 1000), 2);
        assert_eq!(small.subtotal.cents(), 2000);
        assert!(small.discount.is_zero());
        assert_eq!(small.points, 20);

        let bulk = rules.price_item(Product::new("A", 1000), 10);
        assert_eq!(bulk.discount.cents(), 1000);
        assert_eq!(bulk.points, 100);
    }

    #[test]
    fn test_with_builders_replace_policies() {
        let rules = PricingRules::flat()
            .with_discount(QuantityThresholdDiscount::new(1, Rate::from_percent(50)))
            .with_points(SubtotalRatioPoints::new(Rate::from_percent(10)));

        let item = rules.price_item(Product::new("A", 1000), 1);
        assert_eq!(item.discount.cents(), 500);
        assert_eq!(item.points, 100);
    }

    #[derive(Debug)]
    struct FixedDiscount(i64);

    impl DiscountPolicy for FixedDiscount {
        fn discount(&self, _price: Money, quantity: i64) -> Money {
            Money::from_cents(self.0 * quantity)
        }
    }

    #[test]
    fn test_injected_policy() {
        let rules = PricingRules::new(FixedDiscount(7), NoPoints);
        let item = rules.price_item(Product::new("A", 100), 3);
        assert_eq!(item.discount.cents(), 21);
        assert_eq!(item.quantity, 3);
        assert_eq!(item.product.id, "A");
    }
}
