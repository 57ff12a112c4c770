//! Shopping cart state machine.

mod reducer;
mod types;

pub use reducer::{CartEnvironment, CartReducer};
pub use types::{CartAction, CartState, LineItem};
