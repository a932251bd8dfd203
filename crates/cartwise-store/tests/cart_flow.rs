//! End-to-end cart sessions through a provided `CartContext`.

use std::sync::{Arc, Mutex};
use std::thread;

use cartwise_core::{CartState, OrderSummary, PricingRules, Product};
use cartwise_store::{CartContext, CartStore, ContextError, PricingConfig};

fn context(rules: PricingRules) -> CartContext {
    CartContext::provided(Arc::new(CartStore::new(rules)))
}

fn assert_folded(state: &CartState) {
    let subtotal: i64 = state.items().iter().map(|i| i.subtotal.cents()).sum();
    let discount: i64 = state.items().iter().map(|i| i.discount.cents()).sum();
    let points: i64 = state.items().iter().map(|i| i.points).sum();
    let quantity: i64 = state.items().iter().map(|i| i.quantity).sum();

    assert_eq!(state.total_price().cents(), subtotal);
    assert_eq!(state.total_discount().cents(), discount);
    assert_eq!(state.total_points(), points);
    assert_eq!(state.item_count(), quantity);
    assert!(state.items().iter().all(|i| i.quantity > 0));
}

#[test]
fn test_add_merge_and_zero_out() {
    let ctx = context(PricingRules::flat());
    let actions = ctx.actions().unwrap();
    let a = Product::new("A", 100);

    actions.add_to_cart(a.clone(), 2);
    let state = ctx.state().unwrap();
    assert_eq!(state.line_count(), 1);
    assert_eq!(state.items()[0].quantity, 2);
    assert_eq!(state.items()[0].subtotal.cents(), 200);
    assert_eq!(state.item_count(), 2);

    actions.add_to_cart(a, 3);
    let state = ctx.state().unwrap();
    assert_eq!(state.line_count(), 1);
    assert_eq!(state.items()[0].quantity, 5);
    assert_eq!(state.items()[0].subtotal.cents(), 500);
    assert_eq!(state.item_count(), 5);

    actions.update_quantity("A", 0);
    let state = ctx.state().unwrap();
    assert!(state.is_empty());
    assert_eq!(*state, CartState::default());
    assert_eq!(state.summary(), OrderSummary::default());
}

#[test]
fn test_default_pricing_session() {
    let ctx = CartContext::provided(Arc::new(CartStore::from_config(&PricingConfig::default())));
    let store = ctx.store().unwrap();

    store.add_to_cart(Product::new("kbd", 4_900), 1);
    store.add_to_cart(Product::new("cable", 900), 4);
    store.add_to_cart(Product::new("cable", 900), 8);
    store.update_quantity("kbd", 2);
    let state = store.remove_from_cart("missing");

    assert_folded(&state);

    // kbd: 9800, no discount, 98 pts. cable: 12 × 900 = 10800, 10% off, 108 pts.
    let summary = store.summary();
    assert_eq!(summary.subtotal.cents(), 20_600);
    assert_eq!(summary.discount.cents(), 1_080);
    assert_eq!(summary.total.cents(), 19_520);
    assert_eq!(summary.points, 206);
    assert_eq!(summary.item_count, 14);
}

#[test]
fn test_concurrent_writers_keep_totals_consistent() {
    let store = Arc::new(CartStore::new(PricingRules::default()));

    thread::scope(|scope| {
        for worker in 0..8 {
            let store = Arc::clone(&store);
            scope.spawn(move || {
                for _ in 0..50 {
                    store.add_to_cart(Product::new("shared", 100), 1);
                    store.add_to_cart(Product::new(format!("own-{}", worker), 10), 2);
                    assert_folded(&store.state());
                }
            });
        }
    });

    let state = store.state();
    assert_folded(&state);
    assert_eq!(state.item("shared").map(|i| i.quantity), Some(400));
    assert_eq!(state.line_count(), 9);
    assert_eq!(state.item_count(), 400 + 8 * 100);
}

#[test]
fn test_listener_sees_every_transition_in_order() {
    let ctx = context(PricingRules::flat());
    let store = ctx.store().unwrap();
    let counts = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&counts);
    store.subscribe(move |state| sink.lock().unwrap().push(state.item_count()));

    let actions = ctx.actions().unwrap();
    actions.add_to_cart(Product::new("A", 100), 1);
    actions.add_to_cart(Product::new("B", 100), 2);
    actions.update_quantity("B", -3);
    actions.clear_cart();

    assert_eq!(*counts.lock().unwrap(), vec![1, 3, 1, 0]);
}

#[test]
fn test_missing_store_is_reported() {
    let ctx = CartContext::new();

    let err = ctx.actions().err().unwrap();
    assert_eq!(
        err,
        ContextError::NotProvided {
            accessor: "cart actions"
        }
    );
    assert!(err.to_string().contains("CartStore"));
}
