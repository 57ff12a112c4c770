//! Authentication service client.
//!
//! The mock service stands in for a remote identity provider: it waits a
//! configurable latency and then answers from a [`CredentialStore`].

use super::credentials::{CredentialRecord, CredentialStore};
use super::types::{Role, User};
use crate::error::AuthError;
use bookshop_core::environment::IdGenerator;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

/// Default simulated round trip to the identity provider
pub const DEFAULT_AUTH_LATENCY: Duration = Duration::from_millis(500);

/// Details of an account to create
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Identifier chosen for the account
    pub id: String,
    /// Display name
    pub name: String,
    /// Sign-in email
    pub email: String,
    /// Password
    pub password: String,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Authentication client
///
/// Returned futures own everything they need so they can run as store
/// effects.
pub trait AuthService: Send + Sync {
    /// Check a password
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when nothing matches.
    fn login(&self, email: String, password: String) -> BoxFuture<'static, Result<User, AuthError>>;

    /// Create a customer account
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] if the email has an account.
    fn register(&self, account: NewAccount) -> BoxFuture<'static, Result<User, AuthError>>;
}

/// Mock identity provider backed by a credential table
#[derive(Clone)]
pub struct MockAuthService {
    credentials: Arc<dyn CredentialStore>,
    latency: Duration,
}

impl MockAuthService {
    /// Creates a service with the default latency
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            credentials,
            latency: DEFAULT_AUTH_LATENCY,
        }
    }

    /// Override the simulated latency
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl std::fmt::Debug for MockAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuthService")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

fn record_attempt(operation: &'static str, result: &Result<User, AuthError>) {
    let outcome = if result.is_ok() { "success" } else { "failure" };
    metrics::counter!(crate::metrics::AUTH_ATTEMPTS, "operation" => operation, "outcome" => outcome)
        .increment(1);
}

impl AuthService for MockAuthService {
    fn login(&self, email: String, password: String) -> BoxFuture<'static, Result<User, AuthError>> {
        let credentials = Arc::clone(&self.credentials);
        let latency = self.latency;

        Box::pin(async move {
            tokio::time::sleep(latency).await;
            let result = credentials
                .verify(&email, &password)
                .await
                .ok_or(AuthError::InvalidCredentials);
            if result.is_err() {
                tracing::info!(%email, "Sign-in rejected");
            }
            record_attempt("login", &result);
            result
        })
    }

    fn register(&self, account: NewAccount) -> BoxFuture<'static, Result<User, AuthError>> {
        let credentials = Arc::clone(&self.credentials);
        let latency = self.latency;

        Box::pin(async move {
            tokio::time::sleep(latency).await;
            let record = CredentialRecord {
                user: User {
                    id: account.id,
                    email: account.email,
                    name: account.name,
                    role: Role::Customer,
                },
                password: account.password,
            };
            let result = credentials.insert(record).await;
            if let Ok(user) = &result {
                tracing::info!(user_id = %user.id, "Account created");
            }
            record_attempt("register", &result);
            result
        })
    }
}

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
