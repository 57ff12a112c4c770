//! Credential repository.
//!
//! The storefront ships with an in-memory table seeded with two demo
//! accounts. A real identity backend plugs in behind [`CredentialStore`].

use super::types::{Role, User};
use crate::error::AuthError;
use futures::future::BoxFuture;
use std::fmt;
use tokio::sync::RwLock;

/// A user account together with its password
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// The account
    pub user: User,
    /// Plain-text password of a demo account
    pub password: String,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Lookup and insertion of accounts
pub trait CredentialStore: Send + Sync {
    /// The account whose email and password both match exactly
    fn verify<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, Option<User>>;

    /// Add an account unless its email is already taken
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] if an account with the same email
    /// exists. The check and the insert happen under one lock.
    fn insert(&self, record: CredentialRecord) -> BoxFuture<'_, Result<User, AuthError>>;
}

/// Credential table held in memory for the life of the process
#[derive(Debug)]
pub struct InMemoryCredentialStore {
    records: RwLock<Vec<CredentialRecord>>,
}

impl InMemoryCredentialStore {
    /// A table with no accounts
    #[must_use]
    pub fn empty() -> Self {
        Self::with_records(Vec::new())
    }

    /// A table holding exactly these accounts
    #[must_use]
    pub fn with_records(records: Vec<CredentialRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// The demo table: one admin and one customer
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_records(vec![
            CredentialRecord {
                user: User {
                    id: "1".to_string(),
                    email: "admin@bookstore.com".to_string(),
                    name: "Admin User".to_string(),
                    role: Role::Admin,
                },
                password: "admin123".to_string(),
            },
            CredentialRecord {
                user: User {
                    id: "2".to_string(),
                    email: "customer@example.com".to_string(),
                    name: "John Doe".to_string(),
                    role: Role::Customer,
                },
                password: "customer123".to_string(),
            },
        ])
    }

    /// Number of accounts
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn verify<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, Option<User>> {
        Box::pin(async move {
            self.records
                .read()
                .await
                .iter()
                .find(|r| r.user.email == email && r.password == password)
                .map(|r| r.user.clone())
        })
    }

    fn insert(&self, record: CredentialRecord) -> BoxFuture<'_, Result<User, AuthError>> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            if records.iter().any(|r| r.user.email == record.user.email) {
                return Err(AuthError::EmailTaken);
            }
            let user = record.user.clone();
            records.push(record);
            Ok(user)
        })
    }
}
