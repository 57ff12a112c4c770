//! End-to-end shopper flows through a [`Session`].

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use bookshop_testing::{SequentialIdGenerator, test_clock};
use std::sync::Arc;
use storefront::auth::{AuthMode, CredentialsForm, Role};
use storefront::checkout::CheckoutForm;
use storefront::config::StorefrontConfig;
use storefront::error::AuthError;
use storefront::{Session, StorefrontError};

fn session() -> Session {
    Session::builder()
        .config(StorefrontConfig::instant())
        .id_generator(Arc::new(SequentialIdGenerator::new("user")))
        .clock(Arc::new(test_clock()))
        .build()
        .expect("session should start")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn filled_form(mut form: CheckoutForm) -> CheckoutForm {
    form.shipping.address = "1 Main St".to_string();
    form.shipping.city = "Springfield".to_string();
    form.shipping.state = "IL".to_string();
    form.shipping.zip = "62701".to_string();
    form.payment.card_number = "4242 4242 4242 4242".to_string();
    form.payment.expiry = "12/29".to_string();
    form.payment.cvv = "123".to_string();
    form
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn cart_totals_follow_quantities() {
    let session = session();

    // The Alchemist is 12.99, The Very Hungry Caterpillar is 6.00
    session.add_to_cart("4").await.unwrap();
    session.add_to_cart("15").await.unwrap();
    session.add_to_cart("4").await.unwrap();

    let cart = session.cart().await;
    assert!(approx(cart.total(), 31.98));
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.items()[0].book.id.as_str(), "4");

    let summary = session.cart_summary().await;
    assert!(approx(summary.shipping, 4.99));
    assert!(approx(summary.total, 36.97));

    session.update_quantity("15", 0).await.unwrap();
    session.update_quantity("404", 3).await.unwrap();
    assert_eq!(session.item_count().await, 2);

    session.clear_cart().await.unwrap();
    let cart = session.cart().await;
    assert!(cart.is_empty());
    assert!(approx(cart.total(), 0.0));

    session.end().await.unwrap();
}

#[tokio::test]
async fn badge_counts_beyond_u32() {
    let session = session();
    session.add_to_cart("4").await.unwrap();
    session.add_to_cart("15").await.unwrap();
    session.update_quantity("4", 3_000_000_000).await.unwrap();
    session.update_quantity("15", 3_000_000_000).await.unwrap();

    assert_eq!(session.item_count().await, 6_000_000_000);
}

#[tokio::test]
async fn unknown_books_cannot_be_added() {
    let session = session();
    let result = session.add_to_cart("404").await;
    assert!(matches!(result, Err(StorefrontError::BookNotFound(id)) if id.as_str() == "404"));
    assert_eq!(session.item_count().await, 0);
}

#[tokio::test]
async fn shipping_is_free_above_threshold() {
    let session = session();
    let pricing = session.pricing();
    assert!(approx(pricing.shipping(40.0), 0.0));
    assert!(approx(pricing.shipping(20.0), 4.99));

    // Sapiens 21.99 + Dune 19.99 crosses the threshold
    session.add_to_cart("9").await.unwrap();
    session.add_to_cart("3").await.unwrap();
    assert!(approx(session.cart_summary().await.shipping, 0.0));
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn admin_login_succeeds() {
    let session = session();
    assert!(session.login("admin@bookstore.com", "admin123").await.unwrap());

    let user = session.current_user().await.unwrap();
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.id, "1");
    assert!(session.is_authenticated().await);
    assert!(session.is_admin().await);
}

#[tokio::test]
async fn wrong_password_stays_anonymous() {
    let session = session();
    assert!(!session.login("admin@bookstore.com", "admin124").await.unwrap());
    assert!(!session.is_authenticated().await);
    assert_eq!(
        session.last_auth_error().await,
        Some(AuthError::InvalidCredentials)
    );
}

#[tokio::test]
async fn duplicate_registration_keeps_current_user() {
    let session = session();
    assert!(session.login("customer@example.com", "customer123").await.unwrap());

    let created = session
        .register("Impostor", "admin@bookstore.com", "whatever")
        .await
        .unwrap();
    assert!(!created);

    let user = session.current_user().await.unwrap();
    assert_eq!(user.name, "John Doe");
    assert_eq!(session.last_auth_error().await, Some(AuthError::EmailTaken));
}

#[tokio::test]
async fn registration_signs_in_a_new_customer() {
    let session = session();
    assert!(session.register("Ada Lovelace", "ada@example.com", "engine").await.unwrap());

    let user = session.current_user().await.unwrap();
    assert_eq!(user.id, "user-1");
    assert_eq!(user.role, Role::Customer);
    assert!(!session.is_admin().await);

    session.logout().await.unwrap();
    assert!(!session.is_authenticated().await);
    assert!(session.login("ada@example.com", "engine").await.unwrap());
}

#[tokio::test]
async fn invalid_forms_never_reach_the_service() {
    let session = session();
    let form = CredentialsForm::register("", "ada@example", "123");

    match session.submit_credentials(&form, AuthMode::Register).await {
        Err(StorefrontError::InvalidForm(errors)) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
            assert_eq!(fields, vec!["name", "email", "password"]);
        },
        other => panic!("expected InvalidForm, got {other:?}"),
    }
    assert_eq!(session.last_auth_error().await, None);

    let form = CredentialsForm::login("customer@example.com", "customer123");
    assert!(session.submit_credentials(&form, AuthMode::Login).await.unwrap());
}

#[tokio::test]
async fn concurrent_logins_get_their_own_outcome() {
    let session = session();
    let (good, bad) = tokio::join!(
        session.login("customer@example.com", "customer123"),
        session.login("customer@example.com", "nope"),
    );
    assert!(good.unwrap());
    assert!(!bad.unwrap());
}

#[tokio::test]
async fn many_concurrent_logins_all_get_an_answer() {
    let session = session();
    let attempts = (0..64).map(|i| {
        let password = if i % 2 == 0 { "customer123" } else { "nope" };
        session.login("customer@example.com", password)
    });

    let results = futures::future::join_all(attempts).await;
    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap(), i % 2 == 0, "attempt {i}");
    }
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn slow_service_is_unavailable() {
    let config = StorefrontConfig {
        auth_latency_ms: 200,
        response_timeout_ms: 20,
        ..StorefrontConfig::instant()
    };
    let session = Session::start(config).unwrap();

    let result = session.login("admin@bookstore.com", "admin123").await;
    assert!(matches!(
        result,
        Err(StorefrontError::Auth(AuthError::Unavailable(_)))
    ));
    assert!(!session.is_authenticated().await);

    // Ending waits for the slow call; its late answer is dropped, not applied
    session.end().await.unwrap();
}

// ============================================================================
// Checkout, orders and admin
// ============================================================================

#[tokio::test]
async fn checkout_requires_user_items_and_form() {
    let session = session();

    assert!(matches!(
        session.checkout_form().await,
        Err(StorefrontError::NotAuthenticated)
    ));
    assert!(matches!(
        session.place_order(&CheckoutForm::default()).await,
        Err(StorefrontError::NotAuthenticated)
    ));

    session.login("customer@example.com", "customer123").await.unwrap();
    let form = session.checkout_form().await.unwrap();
    assert_eq!(form.shipping.first_name, "John");
    assert_eq!(form.shipping.last_name, "Doe");
    assert_eq!(form.shipping.email, "customer@example.com");

    assert!(matches!(
        session.place_order(&form).await,
        Err(StorefrontError::EmptyCart)
    ));

    session.add_to_cart("2").await.unwrap();
    match session.place_order(&form).await {
        Err(StorefrontError::InvalidForm(errors)) => assert_eq!(errors.len(), 7),
        other => panic!("expected InvalidForm, got {other:?}"),
    }
    assert_eq!(session.item_count().await, 1);
}

#[tokio::test]
async fn placing_an_order_clears_the_cart() {
    let session = session();
    session.login("customer@example.com", "customer123").await.unwrap();
    session.add_to_cart("2").await.unwrap();
    session.add_to_cart("2").await.unwrap();

    let summary = session.checkout_summary().await;
    assert!(approx(summary.subtotal, 37.98));
    assert!(approx(summary.shipping, 0.0));
    assert!(approx(summary.tax, 37.98 * 0.08));

    let form = filled_form(session.checkout_form().await.unwrap());
    let confirmation = session.place_order(&form).await.unwrap();

    assert_eq!(confirmation.order_number, "CV-89600000");
    assert_eq!(confirmation.email, "customer@example.com");
    assert_eq!(confirmation.lines.len(), 1);
    assert_eq!(confirmation.lines[0].quantity, 2);
    assert!(approx(confirmation.summary.total, summary.total));
    assert!(session.cart().await.is_empty());
}

#[tokio::test]
async fn order_summary_matches_its_lines_under_concurrent_adds() {
    let session = session();
    session.login("customer@example.com", "customer123").await.unwrap();
    session.add_to_cart("2").await.unwrap();
    let form = filled_form(session.checkout_form().await.unwrap());

    let (placed, _, _) = tokio::join!(
        session.place_order(&form),
        session.add_to_cart("9"),
        session.add_to_cart("3"),
    );

    let confirmation = placed.unwrap();
    let lines_total: f64 = confirmation.lines.iter().map(|line| line.line_total()).sum();
    assert!(approx(confirmation.summary.subtotal, lines_total));
}

#[tokio::test]
async fn order_history_needs_a_user() {
    let session = session();
    assert!(matches!(
        session.order_history().await,
        Err(StorefrontError::NotAuthenticated)
    ));

    session.login("customer@example.com", "customer123").await.unwrap();
    let orders = session.order_history().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, "CV-12345678");
}

#[tokio::test]
async fn admin_pages_are_forbidden_for_customers() {
    let session = session();
    assert!(matches!(
        session.admin_dashboard().await,
        Err(StorefrontError::Forbidden)
    ));

    session.login("customer@example.com", "customer123").await.unwrap();
    assert!(matches!(
        session.admin_inventory("").await,
        Err(StorefrontError::Forbidden)
    ));

    session.logout().await.unwrap();
    session.login("admin@bookstore.com", "admin123").await.unwrap();
    let dashboard = session.admin_dashboard().await.unwrap();
    assert_eq!(dashboard.stats[0].label, "Total Books");
    assert_eq!(dashboard.recent_orders.len(), 4);
    assert_eq!(session.admin_inventory("").await.unwrap().len(), 8);
    assert_eq!(session.admin_inventory("tolkien").await.unwrap().len(), 1);
}
