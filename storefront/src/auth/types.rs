//! Domain types for authentication.

use crate::error::AuthError;
use serde::{Deserialize, Serialize};

/// What a signed-in user may do
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper
    Customer,
    /// Store staff with dashboard access
    Admin,
}

/// A user account as seen by the rest of the storefront
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Sign-in email
    pub email: String,
    /// Display name
    pub name: String,
    /// Role
    pub role: Role,
}

impl User {
    /// Whether this user has the admin role
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Session authentication state
///
/// Anonymous while `current_user` is `None`. `in_flight` counts sign-in and
/// registration requests that have not answered yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// The signed-in user, if any
    pub current_user: Option<User>,
    /// Requests awaiting an answer from the auth service
    pub in_flight: usize,
    /// Why the most recent request failed
    pub last_error: Option<AuthError>,
}

impl AuthState {
    /// Creates an anonymous state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether someone is signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Whether the signed-in user is an admin
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(User::is_admin)
    }
}

/// Authentication commands and the outcomes the service reports
///
/// Every request carries a `request` number so a caller waiting on the
/// store can pick out its own outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthAction {
    // ========== Commands ==========
    /// Sign in with email and password
    Login {
        /// Correlation number
        request: u64,
        /// Email, matched exactly
        email: String,
        /// Password, matched exactly
        password: String,
    },

    /// Create a customer account and sign in
    Register {
        /// Correlation number
        request: u64,
        /// Display name
        name: String,
        /// Email, must not be taken
        email: String,
        /// Password
        password: String,
    },

    /// Sign out
    Logout,

    // ========== Outcomes ==========
    /// The credentials matched
    LoginSucceeded {
        /// Correlation number
        request: u64,
        /// The matched account
        user: User,
    },

    /// The credentials did not match
    LoginFailed {
        /// Correlation number
        request: u64,
        /// Reason
        error: AuthError,
    },

    /// The account was created
    RegisterSucceeded {
        /// Correlation number
        request: u64,
        /// The new account
        user: User,
    },

    /// The account could not be created
    RegisterFailed {
        /// Correlation number
        request: u64,
        /// Reason
        error: AuthError,
    },
}

impl AuthAction {
    /// The correlation number of an outcome action
    #[must_use]
    pub const fn outcome_of(&self) -> Option<u64> {
        match self {
            Self::LoginSucceeded { request, .. }
            | Self::LoginFailed { request, .. }
            | Self::RegisterSucceeded { request, .. }
            | Self::RegisterFailed { request, .. } => Some(*request),
            Self::Login { .. } | Self::Register { .. } | Self::Logout => None,
        }
    }

    /// Whether this is a successful outcome
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::LoginSucceeded { .. } | Self::RegisterSucceeded { .. }
        )
    }
}
