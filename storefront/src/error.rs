//! Error types for the storefront.
//!
//! Expected domain outcomes (a lookup miss, a rejected sign-in) are not
//! errors. These enums cover malformed seed data, contract violations and
//! runtime failures of the underlying stores.

use crate::catalog::BookId;
use crate::checkout::OrderError;
use bookshop_runtime::StoreError;
use std::fmt;
use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// A single form field that failed validation, with a user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name (`"email"`, `"zip"`, ...)
    pub field: &'static str,
    /// Message shown next to the field
    pub message: String,
}

impl FieldError {
    /// Build a field error
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Problems with catalog seed data or catalog query parameters.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Seed data is not valid JSON for the book schema.
    #[error("catalog data could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two records share an identifier.
    #[error("duplicate book id: {0}")]
    DuplicateId(BookId),

    /// Price is negative or not a number.
    #[error("book {0} has an invalid price")]
    InvalidPrice(BookId),

    /// Original price is below the selling price.
    #[error("book {0} has an original price below its price")]
    InvalidOriginalPrice(BookId),

    /// Rating outside 0 to 5.
    #[error("book {0} has a rating outside 0..=5")]
    InvalidRating(BookId),

    /// Genre name not in the fixed set.
    #[error("unknown genre: {0}")]
    UnknownGenre(String),

    /// Sort order name not recognised.
    #[error("unknown sort order: {0}")]
    UnknownSortKey(String),
}

/// Failures reported by the authentication service.
///
/// These surface as `LoginFailed`/`RegisterFailed` actions; the session
/// turns them into a `false` result rather than an `Err`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential matches the email and password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration with an email that already has an account.
    #[error("An account with this email already exists")]
    EmailTaken,

    /// The service could not be reached or gave up.
    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by [`Session`](crate::session::Session) operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The operation needs a signed-in user.
    #[error("Please sign in to continue")]
    NotAuthenticated,

    /// The operation needs an admin user.
    #[error("Admin access required")]
    Forbidden,

    /// Checkout was attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A submitted form failed validation.
    #[error("{} field(s) need attention", .0.len())]
    InvalidForm(Vec<FieldError>),

    /// A referenced book is not in the catalog.
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// Catalog data or query parameters were rejected.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The authentication service failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Order placement failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// A state store refused or timed out.
    #[error(transparent)]
    Store(#[from] StoreError),
}
