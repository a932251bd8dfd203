//! # cartwise-core: Cart State & Pricing for Cartwise
//!
//! This crate is the **heart** of Cartwise. It holds the cart value, the
//! pricing rules, and the reducer that moves one to the next, as pure
//! functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cartwise Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Cart UI (external)                           │   │
//! │  │    item list ──► quantity input ──► remove ──► order summary    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ intents / snapshots                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               cartwise-store                                    │   │
//! │  │    CartStore (owns state, serialises writes), CartContext       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cartwise-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │   cart    │  │   │
//! │  │   │  Product  │  │   Money   │  │ Discount  │  │ CartState │  │   │
//! │  │   │   Rate    │  │           │  │  Points   │  │ Reducer   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOCKS • NO LOGGING • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and Rate
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Subtotal plus injectable discount/points policies
//! - [`cart`] - CartItem, CartState, CartAction, CartReducer
//! - [`error`] - Validation errors
//! - [`validation`] - Opt-in strict input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use cartwise_core::{CartAction, CartReducer, CartState, PricingRules, Product};
//!
//! let reducer = CartReducer::new(PricingRules::default());
//! let state = reducer.reduce(&CartState::default(), CartAction::add(Product::new("A", 100), 2));
//!
//! assert_eq!(state.total_price().cents(), 200);
//! assert_eq!(state.item_count(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartAction, CartItem, CartReducer, CartState, OrderSummary};
pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use pricing::{
    DiscountPolicy, NoDiscount, NoPoints, PointsPolicy, PricingRules, QuantityThresholdDiscount,
    SubtotalRatioPoints,
};
pub use types::{Product, Rate};
