//! Scripted storefront walkthrough.
//!
//! Browses the bundled catalog, fills a cart, signs in, checks out and
//! visits the admin dashboard. Latencies come from the `STOREFRONT_*`
//! environment variables.

use anyhow::Context;
use storefront::catalog::{BrowseQuery, Genre, GenreFilter, SortKey};
use storefront::checkout::format_price;
use storefront::config::StorefrontConfig;
use storefront::{Session, StorefrontError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StorefrontConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    bookshop_runtime::metrics::register_metrics();
    storefront::metrics::register_business_metrics();

    let session = Session::start(config).context("failed to start session")?;

    println!("=== Chapter & Verse ===\n");

    println!("Featured:");
    for book in session.catalog().featured() {
        println!("  {} by {} - {}", book.title, book.author, format_price(book.price));
    }

    let query = BrowseQuery::new()
        .bestsellers_only()
        .sort_by(SortKey::PriceAsc);
    println!("\nBestsellers, cheapest first:");
    for book in session.catalog().browse(&query) {
        let sale = book
            .discount_percent()
            .map(|pct| format!(" ({pct}% off)"))
            .unwrap_or_default();
        println!("  {} - {}{sale}", book.title, format_price(book.price));
    }

    let fantasy = session
        .catalog()
        .browse(&BrowseQuery::new().genre(GenreFilter::Only(Genre::Fantasy)));
    println!("\n{} {} titles", fantasy.len(), Genre::Fantasy);

    println!("\nFilling the cart...");
    session.add_to_cart("4").await?;
    session.add_to_cart("4").await?;
    session.add_to_cart("15").await?;
    let summary = session.cart_summary().await;
    println!(
        "  {} items, subtotal {}, shipping {}, total {}",
        session.item_count().await,
        format_price(summary.subtotal),
        format_price(summary.shipping),
        format_price(summary.total),
    );
    if let Some(gap) = session.pricing().free_shipping_gap(summary.subtotal) {
        println!("  Add {} more for free shipping", format_price(gap));
    }

    println!("\nSigning in...");
    if !session.login("customer@example.com", "wrong-password").await? {
        println!("  Rejected: {:?}", session.last_auth_error().await);
    }
    if session.login("customer@example.com", "customer123").await? {
        let name = session.current_user().await.map(|u| u.name).unwrap_or_default();
        println!("  Welcome back, {name}!");
    }

    let mut form = session.checkout_form().await?;
    form.shipping.address = "221B Baker Street".to_string();
    form.shipping.city = "London".to_string();
    form.shipping.state = "LDN".to_string();
    form.shipping.zip = "NW1 6XE".to_string();
    form.payment.card_number = "4242 4242 4242 4242".to_string();
    form.payment.expiry = "12/29".to_string();
    form.payment.cvv = "123".to_string();

    println!("\nPlacing order...");
    let confirmation = session.place_order(&form).await?;
    println!(
        "  Order #{} confirmed, {} charged, receipt to {}",
        confirmation.order_number,
        format_price(confirmation.summary.total),
        confirmation.email,
    );
    println!("  Cart now holds {} items", session.item_count().await);

    println!("\nOrder history:");
    for order in session.order_history().await? {
        println!(
            "  {} {} {} {}",
            order.id,
            order.date,
            order.status,
            format_price(order.total)
        );
    }

    match session.admin_dashboard().await {
        Err(StorefrontError::Forbidden) => println!("\nAdmin dashboard: access denied"),
        other => println!("\nAdmin dashboard: {other:?}"),
    }

    session.logout().await?;
    session.login("admin@bookstore.com", "admin123").await?;
    let dashboard = session.admin_dashboard().await?;
    println!("\nAdmin dashboard:");
    for stat in &dashboard.stats {
        println!("  {:<13} {:>8} {}", stat.label, stat.value, stat.change);
    }
    for order in &dashboard.recent_orders {
        println!(
            "  {} {:<12} {} items {:>8} {}",
            order.id,
            order.customer,
            order.items,
            format_price(order.total),
            order.status
        );
    }
    let rows = session.admin_inventory("the").await?;
    println!("  Inventory matching \"the\": {} rows", rows.len());

    session.end().await?;
    Ok(())
}
