//! # Cart Store
//!
//! Owns the current cart and applies every change to it.
//!
//! ## Thread Safety
//! The state lives in a `Mutex<Arc<CartState>>`:
//! 1. Transitions are serialised, so aggregates are never computed from a
//!    half-applied cart
//! 2. Readers get an `Arc` snapshot and release the lock immediately
//! 3. A snapshot is never mutated; later transitions swap in a new `Arc`
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add_to_cart(p, 2) ──► dispatch(AddToCart) ──► lock state               │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                               CartReducer::reduce(&current, action)     │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                               swap in Arc<new state>, unlock            │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                               notify listeners (outside the lock)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cartwise_core::{CartAction, CartReducer, CartState, OrderSummary, PricingRules, Product};
use tracing::{debug, trace};

use crate::config::PricingConfig;

/// Callback invoked with every newly published state.
pub type Listener = Arc<dyn Fn(&CartState) + Send + Sync>;

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// =============================================================================
// Cart Actions
// =============================================================================

/// The write half of the cart: the intents a view may send.
///
/// Views that only forward user input can hold a `&dyn CartActions` and never
/// see the state type.
pub trait CartActions: Send + Sync {
    /// Adds `quantity` units of `product`.
    fn add_to_cart(&self, product: Product, quantity: i64);

    /// Drops the line for `product_id`.
    fn remove_from_cart(&self, product_id: &str);

    /// Sets the quantity of the line for `product_id`.
    fn update_quantity(&self, product_id: &str, quantity: i64);

    /// Empties the cart.
    fn clear_cart(&self);
}

// =============================================================================
// Cart Store
// =============================================================================

/// The single owner of a cart's state.
///
/// Constructed once by the host and shared by reference or `Arc`.
pub struct CartStore {
    reducer: CartReducer,
    state: Mutex<Arc<CartState>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl CartStore {
    /// Creates an empty cart priced with `rules`.
    pub fn new(rules: PricingRules) -> Self {
        CartStore {
            reducer: CartReducer::new(rules),
            state: Mutex::new(Arc::new(CartState::default())),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Creates an empty cart priced as `config` describes.
    pub fn from_config(config: &PricingConfig) -> Self {
        CartStore::new(config.to_rules())
    }

    /// The pricing rules in use.
    pub fn rules(&self) -> &PricingRules {
        self.reducer.rules()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the current state.
    ///
    /// The snapshot stays valid (and unchanged) after later transitions.
    pub fn state(&self) -> Arc<CartState> {
        Arc::clone(&self.lock_state())
    }

    /// Returns the order summary of the current state.
    pub fn summary(&self) -> OrderSummary {
        self.lock_state().summary()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Applies `action` and publishes the resulting state.
    pub fn dispatch(&self, action: CartAction) -> Arc<CartState> {
        debug!(
            action = action.name(),
            product_id = ?action.product_id(),
            "Dispatching cart action"
        );

        let next = {
            let mut current = self.lock_state();
            let next = Arc::new(self.reducer.reduce(&current, action));
            *current = Arc::clone(&next);
            next
        };

        trace!(
            lines = next.line_count(),
            item_count = next.item_count(),
            total_cents = next.total_price().cents(),
            discount_cents = next.total_discount().cents(),
            points = next.total_points(),
            "Cart state published"
        );

        self.publish(&next);
        next
    }

    /// Adds `quantity` units of `product`; non-positive quantities are ignored.
    pub fn add_to_cart(&self, product: Product, quantity: i64) -> Arc<CartState> {
        if quantity <= 0 {
            debug!(product_id = %product.id, quantity, "Ignoring non-positive add quantity");
        }
        self.dispatch(CartAction::add(product, quantity))
    }

    /// Drops the line for `product_id`, if present.
    pub fn remove_from_cart(&self, product_id: &str) -> Arc<CartState> {
        self.dispatch(CartAction::remove(product_id))
    }

    /// Sets the line quantity; values ≤ 0 drop the line.
    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> Arc<CartState> {
        self.dispatch(CartAction::update(product_id, quantity))
    }

    /// Resets to the empty cart.
    pub fn clear_cart(&self) -> Arc<CartState> {
        self.dispatch(CartAction::ClearCart)
    }

    /// Re-folds aggregates from the current lines.
    pub fn recalculate_totals(&self) -> Arc<CartState> {
        self.dispatch(CartAction::RecalculateTotals)
    }

    /// Replaces the whole state, e.g. with a snapshot the host kept.
    ///
    /// Aggregates are re-folded on the way in, so a stale snapshot cannot
    /// break the totals invariant.
    pub fn restore(&self, state: CartState) -> Arc<CartState> {
        debug!(lines = state.line_count(), "Restoring cart state");

        // Only the re-folded state is ever stored, so no writer can reduce
        // from the stale snapshot.
        let next = Arc::new(self.reducer.reduce(&state, CartAction::RecalculateTotals));
        {
            *self.lock_state() = Arc::clone(&next);
        }

        self.publish(&next);
        next
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Registers `listener` to receive every state published after this call.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        debug!(subscription = id.0, "Cart listener subscribed");
        id
    }

    /// Removes a listener. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        before != listeners.len()
    }

    fn publish(&self, state: &CartState) {
        // Copy out so listeners may call back into the store.
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(state);
        }
    }

    // Transitions never leave a half-written state behind, so a poisoned
    // lock still guards a complete value.
    fn lock_state(&self) -> MutexGuard<'_, Arc<CartState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        CartStore::new(PricingRules::default())
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("reducer", &self.reducer)
            .field("state", &*self.lock_state())
            .field("listeners", &self.lock_listeners().len())
            .finish()
    }
}

impl CartActions for CartStore {
    fn add_to_cart(&self, product: Product, quantity: i64) {
        CartStore::add_to_cart(self, product, quantity);
    }

    fn remove_from_cart(&self, product_id: &str) {
        CartStore::remove_from_cart(self, product_id);
    }

    fn update_quantity(&self, product_id: &str, quantity: i64) {
        CartStore::update_quantity(self, product_id, quantity);
    }

    fn clear_cart(&self) {
        CartStore::clear_cart(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn flat_store() -> CartStore {
        CartStore::new(PricingRules::flat())
    }

    #[test]
    fn test_store_starts_empty() {
        let store = CartStore::default();
        assert_eq!(*store.state(), CartState::default());
        assert_eq!(store.summary(), OrderSummary::default());
    }

    #[test]
    fn test_snapshots_survive_later_transitions() {
        let store = flat_store();
        let first = store.add_to_cart(Product::new("A", 100), 2);
        let second = store.add_to_cart(Product::new("A", 100), 3);

        assert_eq!(first.item_count(), 2);
        assert_eq!(second.item_count(), 5);
        assert_eq!(store.state().item_count(), 5);

        store.clear_cart();
        assert_eq!(first.item_count(), 2);
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_listeners_receive_each_published_state() {
        let store = flat_store();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |state| {
            sink.lock().unwrap().push(state.item_count());
        });

        store.add_to_cart(Product::new("A", 100), 2);
        store.update_quantity("A", 7);
        store.remove_from_cart("A");
        assert_eq!(*seen.lock().unwrap(), vec![2, 7, 0]);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add_to_cart(Product::new("B", 100), 1);
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_listener_may_read_the_store() {
        let store = Arc::new(flat_store());
        let reads = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&store);
        let counter = Arc::clone(&reads);
        store.subscribe(move |published| {
            if let Some(store) = weak.upgrade() {
                assert_eq!(*store.state(), *published);
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        store.add_to_cart(Product::new("A", 100), 1);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restore_refolds_aggregates() {
        let store = flat_store();
        let state = store.add_to_cart(Product::new("A", 100), 4);

        let other = flat_store();
        let restored = other.restore((*state).clone());
        assert_eq!(*restored, *state);
        assert!(restored.is_consistent());
    }

    fn stale_snapshot() -> CartState {
        serde_json::from_str(
            r#"{
                "items": [{
                    "product": {"id": "A", "priceCents": 100},
                    "quantity": 3,
                    "subtotal": 300,
                    "discount": 0,
                    "points": 3
                }],
                "totalPrice": 0,
                "totalDiscount": 0,
                "totalPoints": 0,
                "itemCount": 0
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_restore_repairs_stale_snapshot() {
        let store = flat_store();
        let published = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&published);
        store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));

        let stale = stale_snapshot();
        assert!(!stale.is_consistent());

        let restored = store.restore(stale);
        assert!(restored.is_consistent());
        assert_eq!(restored.total_price().cents(), 300);
        assert_eq!(restored.item_count(), 3);
        assert_eq!(*store.state(), *restored);

        let published = published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert!(published.iter().all(CartState::is_consistent));
    }

    #[test]
    fn test_restore_never_exposes_stale_totals_to_concurrent_writers() {
        let store = Arc::new(flat_store());
        let inconsistent = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&inconsistent);
        store.subscribe(move |state| {
            if !state.is_consistent() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let stale = stale_snapshot();
        std::thread::scope(|scope| {
            let restorer = Arc::clone(&store);
            scope.spawn(move || {
                for _ in 0..2_000 {
                    let restored = restorer.restore(stale.clone());
                    assert!(restored.is_consistent());
                }
            });

            let writer = Arc::clone(&store);
            scope.spawn(move || {
                for _ in 0..2_000 {
                    // A non-positive add returns the current state as-is.
                    let state = writer.add_to_cart(Product::new("B", 1), 0);
                    assert!(state.is_consistent());
                }
            });
        });

        assert_eq!(inconsistent.load(Ordering::SeqCst), 0);
        assert!(store.state().is_consistent());
    }

    #[test]
    fn test_actions_trait_object() {
        let store = flat_store();
        let actions: &dyn CartActions = &store;

        actions.add_to_cart(Product::new("A", 100), 2);
        actions.add_to_cart(Product::new("B", 50), 1);
        actions.update_quantity("A", -1);
        assert_eq!(store.state().item_count(), 1);

        actions.remove_from_cart("B");
        assert!(store.state().is_empty());

        actions.add_to_cart(Product::new("C", 10), 1);
        actions.clear_cart();
        assert_eq!(*store.state(), CartState::default());
    }
}
