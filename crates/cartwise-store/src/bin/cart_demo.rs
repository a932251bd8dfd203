//! # Cart Demo
//!
//! Drives a store through a short shopping session and prints the result.
//!
//! ## Usage
//! ```bash
//! RUST_LOG=debug cargo run -p cartwise-store --bin cart-demo -- ./cart.toml
//! ```
//!
//! The optional argument is a pricing config file; without it the platform
//! config directory is tried, then defaults.

use std::path::PathBuf;
use std::sync::Arc;

use cartwise_core::Product;
use cartwise_store::{init_tracing, CartContext, CartStore, PricingConfig};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = PricingConfig::load_or_default(std::env::args().nth(1).map(PathBuf::from));
    info!(?config, "Pricing configuration");

    let ctx = CartContext::provided(Arc::new(CartStore::from_config(&config)));

    ctx.store()?.subscribe(|state| {
        info!(
            lines = state.line_count(),
            item_count = state.item_count(),
            "Cart changed"
        );
    });

    let keyboard = Product::new("kbd-01", 4_900).with_name("Mechanical keyboard");
    let cable = Product::new("usb-c-1m", 900).with_name("USB-C cable");

    let actions = ctx.actions()?;
    actions.add_to_cart(keyboard.clone(), 1);
    actions.add_to_cart(cable.clone(), 4);
    actions.add_to_cart(cable, 8);
    actions.update_quantity(&keyboard.id, 2);
    actions.remove_from_cart("not-in-cart");

    let state = ctx.state()?;
    println!("{}", serde_json::to_string_pretty(&*state)?);
    println!("{}", serde_json::to_string_pretty(&state.summary())?);

    Ok(())
}
