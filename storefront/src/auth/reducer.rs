//! Reducer logic for session authentication.
//!
//! `Login` and `Register` only mark a request as in flight and hand the
//! call to the [`AuthService`] as an effect. The outcome comes back as a
//! `*Succeeded`/`*Failed` action, which is where the current user changes.

use super::service::{AuthService, NewAccount};
use super::types::{AuthAction, AuthState};
use bookshop_core::{SmallVec, effect::Effect, environment::IdGenerator, reducer::Reducer, smallvec};
use std::sync::Arc;

/// Environment dependencies for the auth reducer
#[derive(Clone)]
pub struct AuthEnvironment {
    /// Identity provider client
    pub service: Arc<dyn AuthService>,
    /// Source of ids for new accounts
    pub ids: Arc<dyn IdGenerator>,
}

impl AuthEnvironment {
    /// Creates a new `AuthEnvironment`
    #[must_use]
    pub fn new(service: Arc<dyn AuthService>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { service, ids }
    }
}

/// Reducer for the session's authentication state
#[derive(Clone, Debug, Default)]
pub struct AuthReducer;

impl AuthReducer {
    /// Creates a new `AuthReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn settle(state: &mut AuthState) {
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AuthEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            AuthAction::Login {
                request,
                email,
                password,
            } => {
                state.in_flight += 1;
                state.last_error = None;

                let call = env.service.login(email, password);
                smallvec![Effect::future(async move {
                    Some(match call.await {
                        Ok(user) => AuthAction::LoginSucceeded { request, user },
                        Err(error) => AuthAction::LoginFailed { request, error },
                    })
                })]
            },

            AuthAction::Register {
                request,
                name,
                email,
                password,
            } => {
                state.in_flight += 1;
                state.last_error = None;

                let account = NewAccount {
                    id: env.ids.next_id(),
                    name,
                    email,
                    password,
                };
                let call = env.service.register(account);
                smallvec![Effect::future(async move {
                    Some(match call.await {
                        Ok(user) => AuthAction::RegisterSucceeded { request, user },
                        Err(error) => AuthAction::RegisterFailed { request, error },
                    })
                })]
            },

            AuthAction::Logout => {
                if let Some(user) = state.current_user.take() {
                    tracing::info!(user_id = %user.id, "Signed out");
                }
                state.last_error = None;
                SmallVec::new()
            },

            // ========== Outcomes ==========
            AuthAction::LoginSucceeded { user, .. } | AuthAction::RegisterSucceeded { user, .. } => {
                Self::settle(state);
                tracing::info!(user_id = %user.id, role = ?user.role, "Signed in");
                state.current_user = Some(user);
                state.last_error = None;
                SmallVec::new()
            },

            AuthAction::LoginFailed { error, .. } | AuthAction::RegisterFailed { error, .. } => {
                Self::settle(state);
                state.last_error = Some(error);
                SmallVec::new()
            },
        }
    }
}
