//! # cartwise-store: Cart Ownership for Cartwise
//!
//! The layer a host application talks to. It owns the cart state produced by
//! `cartwise-core`, serialises changes to it, and publishes each new state.
//!
//! ## Modules
//!
//! - [`store`] - `CartStore` and the `CartActions` intent trait
//! - [`context`] - `CartContext`, the handle views use to reach a store
//! - [`config`] - `PricingConfig` loaded from `cart.toml` and `CARTWISE_*` env
//! - [`error`] - Configuration and context errors
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use cartwise_core::Product;
//! use cartwise_store::{CartContext, CartStore, PricingConfig};
//!
//! let store = Arc::new(CartStore::from_config(&PricingConfig::default()));
//! let ctx = CartContext::provided(store);
//!
//! ctx.actions().unwrap().add_to_cart(Product::new("A", 100), 2);
//! assert_eq!(ctx.state().unwrap().total_price().cents(), 200);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod store;

pub use config::{DiscountSettings, PointsSettings, PricingConfig};
pub use context::CartContext;
pub use error::{ConfigError, ConfigResult, ContextError, ContextResult};
pub use store::{CartActions, CartStore, Listener, SubscriptionId};

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,cartwise=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every dispatched action
/// - `RUST_LOG=cartwise_store=trace` - Also show published totals
/// - Default: `info,cartwise=debug`
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
