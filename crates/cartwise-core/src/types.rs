//! # Domain Types
//!
//! Catalog-side types referenced by the cart.
//!
//! ```text
//! ┌─────────────────┐        ┌─────────────────┐
//! │    Product      │        │      Rate       │
//! │  ─────────────  │        │  ─────────────  │
//! │  id (unique)    │        │  bps (u32)      │
//! │  name (opt)     │        │  1000 = 10%     │
//! │  price_cents    │        └─────────────────┘
//! └─────────────────┘
//! ```
//!
//! A `Product` is copied into the `CartItem` that references it, so later
//! catalog changes never reach an item already in the cart.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so `1000` is 10% and every configured
/// discount or points rate is an exact integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// The largest meaningful rate: 100%.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from whole percent (`10` = 10%).
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Rate(percent.saturating_mul(100))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be put in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier; cart items are keyed by it.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Unit price in cents.
    pub price_cents: i64,
}

impl Product {
    /// Creates an unnamed product.
    pub fn new(id: impl Into<String>, price_cents: i64) -> Self {
        Product {
            id: id.into(),
            name: None,
            price_cents,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
