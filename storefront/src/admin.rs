//! Admin dashboard data.
//!
//! Headline figures and recent orders are fixed sample values until a
//! reporting backend exists. The inventory table reads the live catalog.

use crate::catalog::{Book, Catalog};
use crate::orders::OrderStatus;
use serde::Serialize;
use std::sync::Arc;

/// Rows shown in the inventory table
pub const INVENTORY_PAGE_SIZE: usize = 8;

/// A headline figure with its period-over-period change
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatCard {
    /// Label
    pub label: &'static str,
    /// Formatted value
    pub value: &'static str,
    /// Formatted change
    pub change: &'static str,
}

/// A row of the recent orders table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecentOrder {
    /// Order number
    pub id: &'static str,
    /// Customer name
    pub customer: &'static str,
    /// Number of items
    pub items: u32,
    /// Order total
    pub total: f64,
    /// Fulfilment status
    pub status: OrderStatus,
}

/// Everything on the dashboard overview tab
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdminDashboard {
    /// Headline figures
    pub stats: Vec<StatCard>,
    /// Latest orders across all customers
    pub recent_orders: Vec<RecentOrder>,
}

impl AdminDashboard {
    /// The sample dashboard
    #[must_use]
    pub fn sample() -> Self {
        let stat = |label, value, change| StatCard {
            label,
            value,
            change,
        };
        let order = |id, customer, items, total, status| RecentOrder {
            id,
            customer,
            items,
            total,
            status,
        };

        Self {
            stats: vec![
                stat("Total Books", "1,234", "+12%"),
                stat("Total Orders", "856", "+8%"),
                stat("Active Users", "2,341", "+24%"),
                stat("Revenue", "$45,678", "+15%"),
            ],
            recent_orders: vec![
                order("ORD-001", "John Doe", 3, 54.97, OrderStatus::Shipped),
                order("ORD-002", "Jane Smith", 1, 18.99, OrderStatus::Processing),
                order("ORD-003", "Bob Wilson", 2, 32.98, OrderStatus::Delivered),
                order("ORD-004", "Alice Brown", 5, 89.95, OrderStatus::Pending),
            ],
        }
    }
}

/// The inventory table: catalog search, first page only
#[must_use]
pub fn inventory(catalog: &Catalog, query: &str) -> Vec<Arc<Book>> {
    let mut rows = catalog.search(query);
    rows.truncate(INVENTORY_PAGE_SIZE);
    rows
}
