//! Cart store
//!
//! [`CartStore`] pairs the cart state with a storage backend and is the value
//! injected into storefront components: all mutation goes through it, never
//! through an ad-hoc shared global. Every mutation persists the full state
//! synchronously; persistence is fire-and-forget, a failing write is logged
//! and the in-memory state stays authoritative for the session.

use tracing::warn;

use crate::{
    cart::{Cart, CartLine, Section},
    catalog::CatalogRef,
    storage::{CartStorage, StorageError},
};

/// The injected single source of truth for the in-progress order.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Creates a store with an empty cart.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            cart: Cart::new(),
            storage,
        }
    }

    /// Rehydrates the store from persisted state, once, at session start.
    ///
    /// A missing snapshot yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when stored state exists but cannot be
    /// read; callers decide whether to fall back to an empty cart.
    pub fn restore(storage: S) -> Result<Self, StorageError> {
        let cart = storage.load()?.unwrap_or_default();

        Ok(Self { cart, storage })
    }

    /// Read access to the cart state.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds a line (merging by reference) and persists.
    pub fn add(&mut self, line: CartLine) {
        self.cart.add(line);
        self.persist();
    }

    /// Sets a line's quantity (zero removes) and persists.
    pub fn update_quantity(&mut self, reference: CatalogRef, quantity: u32) {
        self.cart.update_quantity(reference, quantity);
        self.persist();
    }

    /// Removes a line and persists.
    pub fn remove(&mut self, reference: CatalogRef) {
        self.cart.remove(reference);
        self.persist();
    }

    /// Empties the cart and persists.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Opens the cart modal and persists.
    pub fn open_modal(&mut self) {
        self.cart.open_modal();
        self.persist();
    }

    /// Closes the cart modal and persists.
    pub fn close_modal(&mut self) {
        self.cart.close_modal();
        self.persist();
    }

    /// Switches the active pane and persists.
    pub fn set_active_section(&mut self, section: Section) {
        self.cart.set_active_section(section);
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(error) = self.storage.save(&self.cart) {
            warn!(%error, "failed to persist cart state");
        }
    }
}
