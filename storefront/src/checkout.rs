//! Pricing, the checkout form and order placement.
//!
//! Tax and shipping are display concerns: they are computed from the cart
//! subtotal on demand and never stored in the cart.

use crate::auth::User;
use crate::cart::LineItem;
use crate::error::FieldError;
use bookshop_core::environment::Clock;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default simulated order processing time
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_millis(2000);

/// Format an amount the way prices are displayed
#[must_use]
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Shipping and tax rules
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Subtotals strictly above this ship free
    pub free_shipping_threshold: f64,
    /// Shipping charged at or below the threshold
    pub flat_shipping: f64,
    /// Sales tax as a fraction of the subtotal
    pub tax_rate: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: 35.00,
            flat_shipping: 4.99,
            tax_rate: 0.08,
        }
    }
}

impl PricingPolicy {
    /// Shipping charge for a subtotal
    #[must_use]
    pub fn shipping(&self, subtotal: f64) -> f64 {
        if subtotal > self.free_shipping_threshold {
            0.0
        } else {
            self.flat_shipping
        }
    }

    /// Tax on a subtotal
    #[must_use]
    pub fn tax(&self, subtotal: f64) -> f64 {
        subtotal * self.tax_rate
    }

    /// How much more is needed for free shipping, if anything
    #[must_use]
    pub fn free_shipping_gap(&self, subtotal: f64) -> Option<f64> {
        (subtotal <= self.free_shipping_threshold)
            .then(|| self.free_shipping_threshold - subtotal)
    }
}

/// Order totals as shown on the cart and checkout pages
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Cart total
    pub subtotal: f64,
    /// Shipping charge
    pub shipping: f64,
    /// Tax, zero on the cart page
    pub tax: f64,
    /// Subtotal plus shipping plus tax
    pub total: f64,
}

impl OrderSummary {
    /// Cart page summary: no tax yet
    #[must_use]
    pub fn cart_preview(subtotal: f64, policy: &PricingPolicy) -> Self {
        let shipping = policy.shipping(subtotal);
        Self {
            subtotal,
            shipping,
            tax: 0.0,
            total: subtotal + shipping,
        }
    }

    /// Checkout page summary including tax
    #[must_use]
    pub fn for_checkout(subtotal: f64, policy: &PricingPolicy) -> Self {
        let shipping = policy.shipping(subtotal);
        let tax = policy.tax(subtotal);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// Where the order goes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub zip: String,
}

impl ShippingDetails {
    /// Start from the signed-in user's name and email
    ///
    /// The name splits at the first space; everything after it is the last
    /// name.
    #[must_use]
    pub fn prefill(user: &User) -> Self {
        let (first_name, last_name) = user.name.split_once(' ').unwrap_or((user.name.as_str(), ""));
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: user.email.clone(),
            ..Self::default()
        }
    }
}

/// Card details. Collected for realism; nothing is charged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PaymentDetails {
    /// Card number as typed
    pub card_number: String,
    /// Expiry, `MM/YY`
    pub expiry: String,
    /// Security code
    pub cvv: String,
}

impl std::fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

/// Everything submitted on the checkout page
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Shipping section
    pub shipping: ShippingDetails,
    /// Payment section
    pub payment: PaymentDetails,
}

impl CheckoutForm {
    /// Every field is required
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per blank field, in form order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let s = &self.shipping;
        let p = &self.payment;
        let fields = [
            ("first_name", "First name", &s.first_name),
            ("last_name", "Last name", &s.last_name),
            ("email", "Email", &s.email),
            ("address", "Address", &s.address),
            ("city", "City", &s.city),
            ("state", "State", &s.state),
            ("zip", "ZIP code", &s.zip),
            ("card_number", "Card number", &p.card_number),
            ("expiry", "Expiry date", &p.expiry),
            ("cvv", "CVV", &p.cvv),
        ];

        let errors: Vec<_> = fields
            .into_iter()
            .filter(|(_, _, value)| value.trim().is_empty())
            .map(|(field, label, _)| FieldError::new(field, format!("{label} is required")))
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// An order handed to the processor
#[derive(Clone, Debug, PartialEq)]
pub struct OrderRequest {
    /// Buyer
    pub user: User,
    /// Cart contents at submission
    pub lines: Vec<LineItem>,
    /// Totals at submission
    pub summary: OrderSummary,
    /// Shipping section of the form
    pub shipping: ShippingDetails,
}

/// Receipt for a placed order
#[derive(Clone, Debug, PartialEq)]
pub struct OrderConfirmation {
    /// `CV-` followed by eight digits
    pub order_number: String,
    /// Where the confirmation email goes
    pub email: String,
    /// What was bought
    pub lines: Vec<LineItem>,
    /// What it cost
    pub summary: OrderSummary,
    /// When the order was accepted
    pub placed_at: DateTime<Utc>,
}

/// Failures while placing an order
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The processor refused the order
    #[error("Order rejected: {0}")]
    Rejected(String),
}

/// Order placement backend
pub trait OrderProcessor: Send + Sync {
    /// Place an order
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] if the backend refuses the order.
    fn place(&self, request: OrderRequest) -> BoxFuture<'static, Result<OrderConfirmation, OrderError>>;
}

/// Accepts every order after a simulated delay
#[derive(Clone)]
pub struct MockOrderProcessor {
    clock: Arc<dyn Clock>,
    delay: Duration,
}

impl MockOrderProcessor {
    /// Creates a processor with the default delay
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            delay: DEFAULT_CHECKOUT_DELAY,
        }
    }

    /// Override the simulated delay
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl std::fmt::Debug for MockOrderProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockOrderProcessor")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// `CV-` plus the last eight digits of the epoch milliseconds
fn order_number(placed_at: DateTime<Utc>) -> String {
    let millis = placed_at.timestamp_millis().unsigned_abs() % 100_000_000;
    format!("CV-{millis:08}")
}

impl OrderProcessor for MockOrderProcessor {
    fn place(&self, request: OrderRequest) -> BoxFuture<'static, Result<OrderConfirmation, OrderError>> {
        let clock = Arc::clone(&self.clock);
        let delay = self.delay;

        Box::pin(async move {
            tokio::time::sleep(delay).await;
            let placed_at = clock.now();
            let confirmation = OrderConfirmation {
                order_number: order_number(placed_at),
                email: request.shipping.email,
                lines: request.lines,
                summary: request.summary,
                placed_at,
            };
            tracing::info!(
                order_number = %confirmation.order_number,
                user_id = %request.user.id,
                total = confirmation.summary.total,
                "Order placed"
            );
            metrics::counter!(crate::metrics::ORDERS_PLACED).increment(1);
            Ok(confirmation)
        })
    }
}
