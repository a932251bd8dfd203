//! # Cart State
//!
//! The cart value, the actions that change it, and the reducer that applies
//! them.
//!
//! ## Transition Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Transitions                               │
//! │                                                                         │
//! │  UI Intent                 CartAction                 Effect on items   │
//! │  ─────────                 ──────────                 ───────────────   │
//! │                                                                         │
//! │  Click "Add" ────────────► AddToCart ───────────────► merge or append   │
//! │                                                                         │
//! │  Change quantity ────────► UpdateQuantity ──────────► set qty (≤0 drops)│
//! │                                                                         │
//! │  Click remove ───────────► RemoveFromCart ──────────► drop line         │
//! │                                                                         │
//! │  Click "Clear" ──────────► ClearCart ───────────────► empty             │
//! │                                                                         │
//! │  (repair) ───────────────► RecalculateTotals ───────► unchanged         │
//! │                                                                         │
//! │  Every arm ends in CartState::from_items(..): aggregates are ALWAYS     │
//! │  folded from the item list, never patched on their own.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use cartwise_core::cart::{CartAction, CartReducer, CartState};
//! use cartwise_core::pricing::PricingRules;
//! use cartwise_core::types::Product;
//!
//! let reducer = CartReducer::new(PricingRules::flat());
//! let empty = CartState::default();
//!
//! let state = reducer.reduce(&empty, CartAction::add(Product::new("A", 100), 2));
//! assert_eq!(state.item_count(), 2);
//! assert_eq!(state.total_price().cents(), 200);
//!
//! // The previous state is untouched.
//! assert!(empty.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::PricingRules;
use crate::types::Product;

// =============================================================================
// Cart Item
// =============================================================================

/// One line in the cart.
///
/// `subtotal`, `discount` and `points` are derived from `product.price_cents`
/// and `quantity`; the reducer re-prices a line whenever it touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Copy of the product taken when the line was created.
    pub product: Product,

    /// Units in the cart. Always > 0 for a line inside a reduced state.
    pub quantity: i64,

    /// `price × quantity`.
    pub subtotal: Money,

    /// Discount granted by the active policy.
    pub discount: Money,

    /// Loyalty points earned by this line.
    pub points: i64,
}

impl CartItem {
    /// The product id this line is keyed by.
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// The full cart: ordered lines plus aggregates folded from them.
///
/// ## Invariants
/// - Lines are unique by product id (adding the same product merges)
/// - `total_price == Σ subtotal`, `total_discount == Σ discount`,
///   `total_points == Σ points`, `item_count == Σ quantity`
///
/// Aggregates are private: the only way to set them is
/// [`CartState::from_items`]. A state deserialised from elsewhere may carry
/// stale aggregates; [`CartAction::RecalculateTotals`] repairs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartState {
    items: Vec<CartItem>,
    total_price: Money,
    total_discount: Money,
    total_points: i64,
    item_count: i64,
}

impl CartState {
    /// Builds a state from `items`, folding every aggregate from them.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total_price: Money = items.iter().map(|i| i.subtotal).sum();
        let total_discount: Money = items.iter().map(|i| i.discount).sum();
        let total_points = items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.points));
        let item_count = items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity));

        CartState {
            items,
            total_price,
            total_discount,
            total_points,
            item_count,
        }
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up the line for `product_id`.
    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id() == product_id)
    }

    /// Sum of line subtotals.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Sum of line discounts.
    pub fn total_discount(&self) -> Money {
        self.total_discount
    }

    /// Sum of line points.
    pub fn total_points(&self) -> i64 {
        self.total_points
    }

    /// Sum of line quantities.
    pub fn item_count(&self) -> i64 {
        self.item_count
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks that every aggregate equals the fold of the current lines.
    pub fn is_consistent(&self) -> bool {
        let folded = CartState::from_items(self.items.clone());
        folded == *self
    }

    /// The checkout-panel view of this cart.
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from(self)
    }
}

// =============================================================================
// Order Summary
// =============================================================================

/// Totals shown next to the cart lines.
///
/// ```text
/// ┌──────────────────────────────────┐
/// │  Subtotal              500.00    │
/// │  Discount              -50.00    │
/// │  ────────────────────────────    │
/// │  Total                 450.00    │
/// │  Points earned              5    │
/// └──────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSummary {
    /// Sum of line subtotals.
    pub subtotal: Money,
    /// Sum of line discounts.
    pub discount: Money,
    /// `subtotal - discount`.
    pub total: Money,
    /// Sum of line points.
    pub points: i64,
    /// Sum of line quantities.
    pub item_count: i64,
}

impl From<&CartState> for OrderSummary {
    fn from(state: &CartState) -> Self {
        OrderSummary {
            subtotal: state.total_price(),
            discount: state.total_discount(),
            total: state.total_price() - state.total_discount(),
            points: state.total_points(),
            item_count: state.item_count(),
        }
    }
}

// =============================================================================
// Cart Action
// =============================================================================

/// Every way the cart can change.
///
/// Serialised with a `type` tag so intents can arrive as JSON:
/// `{"type":"UPDATE_QUANTITY","productId":"A","quantity":3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum CartAction {
    /// Add `quantity` units of `product`, merging with an existing line.
    AddToCart {
        /// Product to add.
        product: Product,
        /// Units to add. Non-positive values leave the cart unchanged.
        quantity: i64,
    },

    /// Drop the line for `product_id`, if any.
    RemoveFromCart {
        /// Line to drop.
        #[serde(rename = "productId")]
        product_id: String,
    },

    /// Set the quantity of the line for `product_id`, if any.
    UpdateQuantity {
        /// Line to change.
        #[serde(rename = "productId")]
        product_id: String,
        /// New quantity. Clamped at zero; zero drops the line.
        quantity: i64,
    },

    /// Reset to the empty cart.
    ClearCart,

    /// Re-fold aggregates from the current lines without touching them.
    RecalculateTotals,
}

impl CartAction {
    /// Shorthand for [`CartAction::AddToCart`].
    pub fn add(product: Product, quantity: i64) -> Self {
        CartAction::AddToCart { product, quantity }
    }

    /// Shorthand for [`CartAction::RemoveFromCart`].
    pub fn remove(product_id: impl Into<String>) -> Self {
        CartAction::RemoveFromCart {
            product_id: product_id.into(),
        }
    }

    /// Shorthand for [`CartAction::UpdateQuantity`].
    pub fn update(product_id: impl Into<String>, quantity: i64) -> Self {
        CartAction::UpdateQuantity {
            product_id: product_id.into(),
            quantity,
        }
    }

    /// Stable name of the action, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CartAction::AddToCart { .. } => "add_to_cart",
            CartAction::RemoveFromCart { .. } => "remove_from_cart",
            CartAction::UpdateQuantity { .. } => "update_quantity",
            CartAction::ClearCart => "clear_cart",
            CartAction::RecalculateTotals => "recalculate_totals",
        }
    }

    /// The product id the action targets, if it targets one.
    pub fn product_id(&self) -> Option<&str> {
        match self {
            CartAction::AddToCart { product, .. } => Some(&product.id),
            CartAction::RemoveFromCart { product_id }
            | CartAction::UpdateQuantity { product_id, .. } => Some(product_id),
            CartAction::ClearCart | CartAction::RecalculateTotals => None,
        }
    }
}

// =============================================================================
// Cart Reducer
// =============================================================================

/// Applies [`CartAction`]s to [`CartState`]s under a set of pricing rules.
///
/// `reduce` is pure: it borrows the old state and returns a new one, so any
/// snapshot a caller already holds stays valid.
#[derive(Debug, Clone, Default)]
pub struct CartReducer {
    rules: PricingRules,
}

impl CartReducer {
    /// Creates a reducer pricing lines with `rules`.
    pub fn new(rules: PricingRules) -> Self {
        CartReducer { rules }
    }

    /// The pricing rules in use.
    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Computes the state that follows `state` after `action`.
    pub fn reduce(&self, state: &CartState, action: CartAction) -> CartState {
        match action {
            CartAction::AddToCart { product, quantity } => self.add(state, product, quantity),
            CartAction::RemoveFromCart { product_id } => remove(state, &product_id),
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => self.update(state, &product_id, quantity),
            CartAction::ClearCart => CartState::default(),
            CartAction::RecalculateTotals => CartState::from_items(state.items.clone()),
        }
    }

    fn add(&self, state: &CartState, product: Product, quantity: i64) -> CartState {
        if quantity <= 0 {
            return state.clone();
        }

        let mut merged = false;
        let mut items: Vec<CartItem> = state
            .items
            .iter()
            .map(|item| {
                if item.product_id() == product.id {
                    merged = true;
                    // The line keeps the product copy it was created with.
                    let new_qty = item.quantity.saturating_add(quantity);
                    self.rules.price_item(item.product.clone(), new_qty)
                } else {
                    item.clone()
                }
            })
            .collect();

        if !merged {
            items.push(self.rules.price_item(product, quantity));
        }

        CartState::from_items(items)
    }

    fn update(&self, state: &CartState, product_id: &str, quantity: i64) -> CartState {
        let quantity = quantity.max(0);
        let items = state
            .items
            .iter()
            .map(|item| {
                if item.product_id() == product_id {
                    self.rules.price_item(item.product.clone(), quantity)
                } else {
                    item.clone()
                }
            })
            .filter(|item| item.quantity > 0)
            .collect();

        CartState::from_items(items)
    }
}

fn remove(state: &CartState, product_id: &str) -> CartState {
    let items = state
        .items
        .iter()
        .filter(|item| item.product_id() != product_id)
        .cloned()
        .collect();

    CartState::from_items(items)
}

// =============================================================================
// Unit Tests
// =============================================================================
