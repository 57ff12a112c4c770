//! Storefront business metrics.
//!
//! ## Counters
//! - `storefront.auth.attempts{operation, outcome}` - Sign-in and registration attempts
//! - `storefront.orders.placed` - Orders accepted by the order processor

use metrics::{Unit, describe_counter};

/// Sign-in and registration attempts, labelled by operation and outcome
pub const AUTH_ATTEMPTS: &str = "storefront.auth.attempts";

/// Orders accepted by the order processor
pub const ORDERS_PLACED: &str = "storefront.orders.placed";

/// Describe every metric the storefront emits
///
/// Call once at startup, next to
/// [`bookshop_runtime::metrics::register_metrics`].
pub fn register_business_metrics() {
    describe_counter!(
        AUTH_ATTEMPTS,
        Unit::Count,
        "Sign-in and registration attempts by operation (login, register) and outcome"
    );
    describe_counter!(ORDERS_PLACED, Unit::Count, "Orders accepted at checkout");

    tracing::debug!("Storefront metrics registered");
}
