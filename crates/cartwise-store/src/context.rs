//! # Cart Context
//!
//! An explicit slot through which views reach the cart.
//!
//! The host builds one [`CartStore`], provides it to a [`CartContext`], and
//! hands clones of the context to whatever renders the cart. There is no
//! process-wide cart: a view given an empty context gets a
//! [`ContextError::NotProvided`] on first access instead of a silent default.
//!
//! ```text
//!   host: CartContext::provided(Arc<CartStore>)
//!            │
//!            ├──► cart list view     ctx.state()?    → Arc<CartState>
//!            ├──► quantity controls  ctx.actions()?  → &dyn CartActions
//!            └──► summary panel      ctx.store()?.summary()
//! ```

use std::sync::Arc;

use cartwise_core::CartState;

use crate::error::{ContextError, ContextResult};
use crate::store::{CartActions, CartStore};

/// A cloneable handle to a cart store that may not have been provided yet.
#[derive(Debug, Clone, Default)]
pub struct CartContext {
    store: Option<Arc<CartStore>>,
}

impl CartContext {
    /// Creates a context with no store.
    pub fn new() -> Self {
        CartContext::default()
    }

    /// Creates a context already holding `store`.
    pub fn provided(store: Arc<CartStore>) -> Self {
        CartContext { store: Some(store) }
    }

    /// Provides (or replaces) the store behind this context.
    pub fn provide(&mut self, store: Arc<CartStore>) {
        self.store = Some(store);
    }

    /// Checks whether a store has been provided.
    pub fn is_provided(&self) -> bool {
        self.store.is_some()
    }

    /// The full store: reads, writes and subscriptions.
    pub fn store(&self) -> ContextResult<&Arc<CartStore>> {
        self.require("cart store")
    }

    /// A snapshot of the current cart state.
    pub fn state(&self) -> ContextResult<Arc<CartState>> {
        self.require("cart state").map(|store| store.state())
    }

    /// The intent-only view of the store.
    pub fn actions(&self) -> ContextResult<&dyn CartActions> {
        let store: &CartStore = self.require("cart actions")?;
        let actions: &dyn CartActions = store;
        Ok(actions)
    }

    fn require(&self, accessor: &'static str) -> ContextResult<&Arc<CartStore>> {
        self.store
            .as_ref()
            .ok_or(ContextError::NotProvided { accessor })
    }
}
