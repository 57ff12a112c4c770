//! Bookshop storefront domain.
//!
//! Browsing, cart, sign-in and checkout for an online bookshop, backed by an
//! in-memory catalog and mock identity and order backends.
//!
//! - [`catalog`]: read-only book lookups, search, filters and sorting
//! - [`cart`]: the cart state machine, a reducer with a derived total
//! - [`auth`]: the current user, with sign-in delegated to an [`auth::AuthService`]
//! - [`checkout`], [`orders`], [`admin`]: pricing, order placement, history
//!   and the admin dashboard
//! - [`session`]: the context object that owns one shopper's stores
//! - [`metrics`]: names and descriptions of the business counters
//!
//! # Quick Start
//!
//! ```no_run
//! use storefront::{config::StorefrontConfig, session::Session};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::start(StorefrontConfig::from_env())?;
//!
//! session.add_to_cart("3").await?;
//! session.add_to_cart("3").await?;
//! println!("Items: {}", session.item_count().await);
//!
//! if session.login("customer@example.com", "customer123").await? {
//!     println!("Welcome back, {:?}", session.current_user().await);
//! }
//!
//! session.end().await?;
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod metrics;
pub mod orders;
pub mod session;

pub use error::{Result, StorefrontError};
pub use session::Session;
