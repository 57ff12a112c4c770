//! Given-When-Then harness for reducers.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use bookshop_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Several actions may be queued with repeated `when_action` calls; they
/// are reduced in order and the effect assertions see the effects of the
/// last one.
///
/// # Example
///
/// ```ignore
/// ReducerTest::new(CartReducer::new())
///     .with_env(CartEnvironment)
///     .given_state(CartState::default())
///     .when_action(CartAction::AddItem { book: dune.clone() })
///     .when_action(CartAction::AddItem { book: dune })
///     .then_state(|state| assert_eq!(state.item_count(), 2))
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an action to reduce (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use bookshop_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshop_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

    #[derive(Clone, Debug)]
    struct WishlistState {
        titles: Vec<&'static str>,
    }

    #[derive(Clone, Debug)]
    enum WishlistAction {
        Save(&'static str),
        Forget(&'static str),
        Notify,
    }

    struct WishlistReducer;

    struct WishlistEnv;

    impl Reducer for WishlistReducer {
        type State = WishlistState;
        type Action = WishlistAction;
        type Environment = WishlistEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                WishlistAction::Save(title) => {
                    state.titles.push(title);
                    smallvec![Effect::None]
                },
                WishlistAction::Forget(title) => {
                    state.titles.retain(|t| *t != title);
                    SmallVec::new()
                },
                WishlistAction::Notify => smallvec![Effect::future(async { None })],
            }
        }
    }

    #[test]
    fn single_action() {
        ReducerTest::new(WishlistReducer)
            .with_env(WishlistEnv)
            .given_state(WishlistState { titles: vec![] })
            .when_action(WishlistAction::Save("Dune"))
            .then_state(|state| {
                assert_eq!(state.titles, vec!["Dune"]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn queued_actions_reduce_in_order() {
        ReducerTest::new(WishlistReducer)
            .with_env(WishlistEnv)
            .given_state(WishlistState { titles: vec![] })
            .when_action(WishlistAction::Save("Dune"))
            .when_action(WishlistAction::Save("Emma"))
            .when_action(WishlistAction::Forget("Dune"))
            .then_state(|state| {
                assert_eq!(state.titles, vec!["Emma"]);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 0))
            .run();
    }

    #[test]
    fn future_effects_are_reported() {
        ReducerTest::new(WishlistReducer)
            .with_env(WishlistEnv)
            .given_state(WishlistState { titles: vec![] })
            .when_action(WishlistAction::Notify)
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<WishlistAction>(&[Effect::None]);
        assertions::assert_no_effects::<WishlistAction>(&[]);
    }
}
