//! Session authentication against a mock identity provider.
//!
//! [`AuthReducer`] owns the current user. Sign-in and registration are
//! delegated to an [`AuthService`] through effects, so a real provider can
//! replace [`MockAuthService`] without touching the reducer.

mod credentials;
mod form;
mod reducer;
mod service;
mod types;

pub use credentials::{CredentialRecord, CredentialStore, InMemoryCredentialStore};
pub use form::{AuthMode, CredentialsForm, MIN_PASSWORD_LEN};
pub use reducer::{AuthEnvironment, AuthReducer};
pub use service::{AuthService, DEFAULT_AUTH_LATENCY, MockAuthService, NewAccount, UuidGenerator};
pub use types::{AuthAction, AuthState, Role, User};
