//! Guard predicates for controlling transitions.
//!
//! A guard decides whether a transition is eligible for a given input.
//! Guards of one state's transitions must be mutually exclusive: the
//! runner never arbitrates between two accepting transitions.

use super::hook::Session;
use std::sync::Arc;

type Predicate<C, I> = dyn Fn(&I, &Session<'_, C, I>) -> bool + Send + Sync;

/// Predicate over the input and the live session.
///
/// # Example
///
/// ```rust
/// use statewright::core::Guard;
///
/// let is_one: Guard<(), u8> = Guard::new(|input: &u8, _| *input == 1);
/// # let _ = is_one;
/// ```
pub struct Guard<C, I> {
    predicate: Arc<Predicate<C, I>>,
}

impl<C, I> Guard<C, I> {
    /// Create a guard from a predicate over the input and session.
    ///
    /// The predicate should be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&I, &Session<'_, C, I>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Create a guard that only looks at the input.
    pub fn on_input<F>(predicate: F) -> Self
    where
        F: Fn(&I) -> bool + Send + Sync + 'static,
    {
        Self::new(move |input, _| predicate(input))
    }

    pub fn check(&self, input: &I, session: &Session<'_, C, I>) -> bool {
        (self.predicate)(input, session)
    }
}

impl<C, I> Clone for Guard<C, I> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{State, StateId};
    use uuid::Uuid;

    struct Counter {
        threshold: u32,
    }

    fn state() -> State<Counter, u32> {
        State {
            id: StateId::new(1),
            label: None,
            is_source: true,
            transitions: Vec::new(),
            on_enter: None,
            on_exit: None,
        }
    }

    #[test]
    fn guard_sees_input() {
        let s = state();
        let mut ctx = Counter { threshold: 0 };
        let session = Session::new(Uuid::nil(), &s, &mut ctx, None);
        let guard = Guard::on_input(|i: &u32| *i % 2 == 0);

        assert!(guard.check(&4, &session));
        assert!(!guard.check(&3, &session));
    }

    #[test]
    fn guard_sees_context() {
        let s = state();
        let mut ctx = Counter { threshold: 10 };
        let session = Session::new(Uuid::nil(), &s, &mut ctx, None);
        let guard = Guard::new(|i: &u32, s: &Session<'_, Counter, u32>| *i > s.context().threshold);

        assert!(guard.check(&11, &session));
        assert!(!guard.check(&10, &session));
    }

    #[test]
    fn guard_is_deterministic() {
        let s = state();
        let mut ctx = Counter { threshold: 0 };
        let session = Session::new(Uuid::nil(), &s, &mut ctx, None);
        let guard = Guard::on_input(|i: &u32| *i == 7);

        assert_eq!(guard.check(&7, &session), guard.check(&7, &session));
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let s = state();
        let mut ctx = Counter { threshold: 0 };
        let session = Session::new(Uuid::nil(), &s, &mut ctx, None);
        let guard = Guard::on_input(|i: &u32| *i == 1);
        let copy = guard.clone();

        assert_eq!(guard.check(&1, &session), copy.check(&1, &session));
    }
}
