//! Integration tests for Store action broadcasting
//!
//! Observers see the outcome actions produced by effects, which is how the
//! session layer turns an asynchronous sign-in into a plain success flag.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use bookshop_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use bookshop_runtime::{Store, StoreError};
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum LookupAction {
    /// Ask the (simulated) remote service for a title
    Lookup { request: u64, isbn: String },
    /// The service answered
    Found { request: u64, title: String },
    /// The service had nothing for that ISBN
    Missing { request: u64 },
}

#[derive(Debug, Clone, Default)]
struct LookupState {
    in_flight: usize,
    titles: Vec<String>,
}

#[derive(Clone)]
struct LookupEnvironment {
    latency: Duration,
}

#[derive(Clone)]
struct LookupReducer;

impl Reducer for LookupReducer {
    type State = LookupState;
    type Action = LookupAction;
    type Environment = LookupEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LookupAction::Lookup { request, isbn } => {
                state.in_flight += 1;
                let latency = env.latency;
                smallvec![Effect::future(async move {
                    tokio::time::sleep(latency).await;
                    if isbn.starts_with("978") {
                        Some(LookupAction::Found {
                            request,
                            title: format!("Book {isbn}"),
                        })
                    } else {
                        Some(LookupAction::Missing { request })
                    }
                })]
            },
            LookupAction::Found { title, .. } => {
                state.in_flight -= 1;
                state.titles.push(title);
                SmallVec::new()
            },
            LookupAction::Missing { .. } => {
                state.in_flight -= 1;
                SmallVec::new()
            },
        }
    }
}

fn store(latency: Duration) -> Store<LookupState, LookupAction, LookupEnvironment, LookupReducer> {
    Store::new(
        LookupState::default(),
        LookupReducer,
        LookupEnvironment { latency },
    )
}

fn is_outcome_for(request: u64) -> impl Fn(&LookupAction) -> bool + Send + 'static {
    move |action| {
        matches!(
            action,
            LookupAction::Found { request: r, .. } | LookupAction::Missing { request: r }
                if *r == request
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn outcome_is_observed_after_state_update() {
    let store = store(Duration::from_millis(5));

    let outcome = store
        .send_and_wait_for(
            LookupAction::Lookup {
                request: 1,
                isbn: "9780441013593".to_string(),
            },
            is_outcome_for(1),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, LookupAction::Found { request: 1, .. }));
    let (in_flight, titles) = store.state(|s| (s.in_flight, s.titles.clone())).await;
    assert_eq!(in_flight, 0);
    assert_eq!(titles, vec!["Book 9780441013593".to_string()]);
}

#[tokio::test]
async fn concurrent_requests_are_correlated() {
    let store = store(Duration::from_millis(5));

    let first = store.send_and_wait_for(
        LookupAction::Lookup {
            request: 10,
            isbn: "9780062315007".to_string(),
        },
        is_outcome_for(10),
        Duration::from_secs(2),
    );
    let second = store.send_and_wait_for(
        LookupAction::Lookup {
            request: 11,
            isbn: "unknown".to_string(),
        },
        is_outcome_for(11),
        Duration::from_secs(2),
    );

    let (first, second) = tokio::join!(first, second);
    assert!(matches!(first.unwrap(), LookupAction::Found { request: 10, .. }));
    assert_eq!(second.unwrap(), LookupAction::Missing { request: 11 });
}

#[tokio::test]
async fn every_waiter_gets_its_outcome_beyond_broadcast_capacity() {
    let store = store(Duration::ZERO);

    let lookups = (0..100u64).map(|request| {
        let isbn = if request % 3 == 0 { "0000" } else { "9780000000000" };
        store.send_and_wait_for(
            LookupAction::Lookup {
                request,
                isbn: isbn.to_string(),
            },
            is_outcome_for(request),
            Duration::from_secs(2),
        )
    });

    let outcomes = futures::future::join_all(lookups).await;
    for (request, outcome) in (0..100u64).zip(outcomes) {
        match outcome.unwrap() {
            LookupAction::Found { request: r, .. } => assert!(r == request && request % 3 != 0),
            LookupAction::Missing { request: r } => assert!(r == request && request % 3 == 0),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(store.state(|s| s.in_flight).await, 0);
}

#[tokio::test]
async fn timed_out_waiter_does_not_block_later_ones() {
    let store = store(Duration::from_millis(100));

    let late = store
        .send_and_wait_for(
            LookupAction::Lookup {
                request: 1,
                isbn: "978".to_string(),
            },
            is_outcome_for(1),
            Duration::from_millis(10),
        )
        .await;
    assert_eq!(late.unwrap_err(), StoreError::Timeout);

    let next = store
        .send_and_wait_for(
            LookupAction::Lookup {
                request: 2,
                isbn: "978".to_string(),
            },
            is_outcome_for(2),
            Duration::from_secs(2),
        )
        .await
        .unwrap();
    assert!(matches!(next, LookupAction::Found { request: 2, .. }));
}

#[tokio::test]
async fn subscribers_only_see_effect_outcomes() {
    let store = store(Duration::ZERO);
    let mut rx = store.subscribe_actions();

    let mut handle = store
        .send(LookupAction::Lookup {
            request: 7,
            isbn: "0000".to_string(),
        })
        .await
        .unwrap();
    handle.wait().await;

    assert_eq!(rx.recv().await.unwrap(), LookupAction::Missing { request: 7 });
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn waiting_after_shutdown_fails_fast() {
    let store = store(Duration::ZERO);
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = store
        .send_and_wait_for(
            LookupAction::Lookup {
                request: 3,
                isbn: "978".to_string(),
            },
            is_outcome_for(3),
            Duration::from_secs(1),
        )
        .await;

    assert_eq!(result.unwrap_err(), StoreError::ShutdownInProgress);
}
