//! Domain types for the shopping cart.

use crate::catalog::{Book, BookId};
use std::sync::Arc;

/// One book in the cart and how many copies
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    /// The catalog record, shared with the catalog
    pub book: Arc<Book>,
    /// Number of copies, always at least 1
    pub quantity: u32,
}

impl LineItem {
    /// Price times quantity
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.book.price * f64::from(self.quantity)
    }
}

/// Line items in insertion order plus the derived total
///
/// The total is private and recomputed from the items after every change,
/// so it can never drift from them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartState {
    items: Vec<LineItem>,
    total: f64,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Line items in the order they were first added
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of price times quantity over all lines
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Sum of quantities, shown on the cart badge
    ///
    /// Widened to `u64`: every line may hold up to `u32::MAX` copies.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Whether the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for a book, if it is in the cart
    #[must_use]
    pub fn line(&self, id: &BookId) -> Option<&LineItem> {
        self.items.iter().find(|line| &line.book.id == id)
    }

    pub(super) fn add(&mut self, book: Arc<Book>) {
        if let Some(line) = self.items.iter_mut().find(|line| line.book.id == book.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.items.push(LineItem { book, quantity: 1 });
        }
        self.recompute_total();
    }

    /// Returns whether a line was removed
    pub(super) fn remove(&mut self, id: &BookId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.book.id != id);
        self.recompute_total();
        self.items.len() != before
    }

    /// Returns whether a line was changed
    pub(super) fn set_quantity(&mut self, id: &BookId, quantity: u32) -> bool {
        let Some(line) = self.items.iter_mut().find(|line| &line.book.id == id) else {
            return false;
        };
        line.quantity = quantity;
        self.recompute_total();
        true
    }

    pub(super) fn clear(&mut self) {
        self.items.clear();
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total = self.items.iter().map(LineItem::line_total).sum();
    }
}

/// Everything that can happen to a cart
#[derive(Clone, Debug, PartialEq)]
pub enum CartAction {
    /// Add one copy of a book
    AddItem {
        /// Book to add
        book: Arc<Book>,
    },

    /// Drop a book's line entirely
    RemoveItem {
        /// Book to remove
        book_id: BookId,
    },

    /// Set a line's quantity; zero or less removes the line
    UpdateQuantity {
        /// Book whose line changes
        book_id: BookId,
        /// New quantity as entered by the user
        quantity: i64,
    },

    /// Empty the cart
    ClearCart,
}
