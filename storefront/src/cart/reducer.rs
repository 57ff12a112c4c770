//! Reducer logic for the shopping cart.
//!
//! Every transition is synchronous and produces no effects. Operations on
//! a book that is not in the cart are no-ops.

use super::types::{CartAction, CartState};
use bookshop_core::{SmallVec, effect::Effect, reducer::Reducer};

/// The cart needs no injected dependencies
#[derive(Clone, Copy, Debug, Default)]
pub struct CartEnvironment;

/// Reducer for the session cart
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CartAction::AddItem { book } => {
                tracing::debug!(book_id = %book.id, "Adding to cart");
                state.add(book);
            },
            CartAction::RemoveItem { book_id } => {
                if !state.remove(&book_id) {
                    tracing::debug!(%book_id, "Remove ignored, book not in cart");
                }
            },
            CartAction::UpdateQuantity { book_id, quantity } if quantity <= 0 => {
                state.remove(&book_id);
            },
            CartAction::UpdateQuantity { book_id, quantity } => {
                let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                if !state.set_quantity(&book_id, quantity) {
                    tracing::debug!(%book_id, "Quantity update ignored, book not in cart");
                }
            },
            CartAction::ClearCart => state.clear(),
        }

        SmallVec::new()
    }
}
