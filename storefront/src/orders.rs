//! Order history.
//!
//! There is no order database yet; [`FixtureOrderHistory`] serves the same
//! two past orders to every signed-in user.

use crate::auth::User;
use chrono::NaiveDate;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an order is in fulfilment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Received, not yet started
    Pending,
    /// Being packed
    Processing,
    /// With the carrier
    Shipped,
    /// Arrived
    Delivered,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
        };
        f.write_str(label)
    }
}

/// A line of a past order, denormalised at purchase time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderedItem {
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Copies bought
    pub quantity: u32,
    /// Unit price paid
    pub price: f64,
}

/// A past order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order number
    pub id: String,
    /// Purchase date
    pub date: NaiveDate,
    /// Fulfilment status
    pub status: OrderStatus,
    /// Amount charged
    pub total: f64,
    /// What was bought
    pub items: Vec<OrderedItem>,
}

impl OrderRecord {
    /// Total copies in the order
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Source of a user's past orders
pub trait OrderHistory: Send + Sync {
    /// Orders placed by `user`, newest first
    fn orders_for(&self, user: &User) -> BoxFuture<'static, Vec<OrderRecord>>;
}

/// Static sample orders
#[derive(Clone, Debug, Default)]
pub struct FixtureOrderHistory;

fn item(title: &str, author: &str, quantity: u32, price: f64) -> OrderedItem {
    OrderedItem {
        title: title.to_string(),
        author: author.to_string(),
        quantity,
        price,
    }
}

impl FixtureOrderHistory {
    /// The sample orders
    #[must_use]
    pub fn records() -> Vec<OrderRecord> {
        vec![
            OrderRecord {
                id: "CV-12345678".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap_or_default(),
                status: OrderStatus::Delivered,
                total: 54.97,
                items: vec![
                    item("The Midnight Library", "Matt Haig", 1, 16.99),
                    item("Atomic Habits", "James Clear", 2, 18.99),
                ],
            },
            OrderRecord {
                id: "CV-12345679".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap_or_default(),
                status: OrderStatus::Shipped,
                total: 32.98,
                items: vec![
                    item("Dune", "Frank Herbert", 1, 19.99),
                    item("The Alchemist", "Paulo Coelho", 1, 12.99),
                ],
            },
        ]
    }
}

impl OrderHistory for FixtureOrderHistory {
    fn orders_for(&self, user: &User) -> BoxFuture<'static, Vec<OrderRecord>> {
        tracing::debug!(user_id = %user.id, "Loading fixture order history");
        Box::pin(async { Self::records() })
    }
}
