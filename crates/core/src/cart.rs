//! Cart state
//!
//! The in-progress order before submission: an ordered list of lines unique
//! by catalog reference, plus the two UI flags the storefront persists with
//! them. All mutation is synchronous; the embedding event loop serializes
//! handlers, so no locking is involved.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, CatalogRef};

/// Which storefront pane is active on single-pane (mobile) layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Catalog browsing.
    #[default]
    Products,

    /// Cart review.
    Cart,

    /// Delivery and payment form.
    Payment,
}

/// One cart line: a catalog entity and the quantity taken of it.
///
/// The quantity is a [`NonZeroU32`]: a line that would reach zero is removed
/// from the cart instead, so a zero-quantity line is unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    reference: CatalogRef,
    name: String,
    unit_price: u64,
    quantity: NonZeroU32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_ref: Option<String>,
}

impl CartLine {
    /// Creates a line with quantity 1.
    #[must_use]
    pub fn new(reference: CatalogRef, name: impl Into<String>, unit_price: u64) -> Self {
        Self {
            reference,
            name: name.into(),
            unit_price,
            quantity: NonZeroU32::MIN,
            unit_label: None,
            image_ref: None,
        }
    }

    /// Builds a line from a browsed catalog entry, quantity 1.
    #[must_use]
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            reference: entry.reference,
            name: entry.name.clone(),
            unit_price: entry.unit_price,
            quantity: NonZeroU32::MIN,
            unit_label: entry.unit_label.clone(),
            image_ref: entry.image_ref.clone(),
        }
    }

    /// Replaces the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: NonZeroU32) -> Self {
        self.quantity = quantity;
        self
    }

    /// The catalog reference identifying this line.
    #[must_use]
    pub fn reference(&self) -> CatalogRef {
        self.reference
    }

    /// Display name captured when the line was added.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price per unit in whole FCFA.
    #[must_use]
    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// Quantity taken.
    #[must_use]
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Sale unit shown next to the price, if any.
    #[must_use]
    pub fn unit_label(&self) -> Option<&str> {
        self.unit_label.as_deref()
    }

    /// Opaque picture reference, if any.
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// Line amount: quantity times unit price.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        u64::from(self.quantity.get()).saturating_mul(self.unit_price)
    }
}

/// Cart state: the single source of truth for the in-progress order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    #[serde(default)]
    modal_open: bool,
    #[serde(default)]
    active_section: Section,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line, merging by catalog reference.
    ///
    /// If a line with the same reference already exists its quantity is
    /// incremented by the added quantity; otherwise the line is appended.
    /// Always succeeds.
    pub fn add(&mut self, line: CartLine) {
        let position = self
            .lines
            .iter()
            .position(|l| l.reference == line.reference);

        match position {
            Some(idx) => {
                if let Some(existing) = self.lines.get_mut(idx) {
                    existing.quantity = existing.quantity.saturating_add(line.quantity.get());
                }
            }
            None => self.lines.push(line),
        }
    }

    /// Sets a line's quantity directly; zero removes the line.
    ///
    /// Unknown references are ignored.
    pub fn update_quantity(&mut self, reference: CatalogRef, quantity: u32) {
        match NonZeroU32::new(quantity) {
            Some(quantity) => {
                if let Some(line) = self.line_mut(reference) {
                    line.quantity = quantity;
                }
            }
            None => self.remove(reference),
        }
    }

    /// Removes the line with the given reference; no-op if absent.
    pub fn remove(&mut self, reference: CatalogRef) {
        self.lines.retain(|line| line.reference != reference);
    }

    /// Empties the cart, leaving the UI flags untouched.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The line with the given reference, if present.
    #[must_use]
    pub fn line(&self, reference: CatalogRef) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.reference == reference)
    }

    /// All lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterates over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line quantities. Recomputed fresh on every call.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Sum of line amounts in whole FCFA. Recomputed fresh on every call.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.line_total()))
    }

    /// Opens the cart modal.
    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    /// Closes the cart modal.
    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    /// Whether the cart modal is open.
    #[must_use]
    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Switches the active storefront pane.
    pub fn set_active_section(&mut self, section: Section) {
        self.active_section = section;
    }

    /// The active storefront pane.
    #[must_use]
    pub fn active_section(&self) -> Section {
        self.active_section
    }

    fn line_mut(&mut self, reference: CatalogRef) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.reference == reference)
    }
}
