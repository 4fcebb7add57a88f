//! Builder API for graph construction.
//!
//! Declarations are accumulated by fluent builders. Every scalar field is
//! assign-once; mistakes are collected and reported together by
//! `FsmBuilder::build`, which then hands the materialized states to the
//! graph for structural validation.

pub mod error;
pub mod machine;
pub mod state;
pub mod transition;

pub use error::{BuildError, Field};
pub use machine::FsmBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;

use crate::core::StateId;

/// Create an unconditional transition declaration.
///
/// # Example
///
/// ```
/// use statewright::builder::{simple_transition, FsmBuilder};
///
/// let fsm = FsmBuilder::<(), ()>::new()
///     .state(|s| s.id(1).source().add_transition(simple_transition(2)))
///     .state(|s| s.id(2))
///     .build()
///     .unwrap();
///
/// assert_eq!(fsm.source().transitions().len(), 1);
/// ```
pub fn simple_transition<C, I>(to: impl Into<StateId>) -> TransitionBuilder<C, I> {
    TransitionBuilder::new().to(to)
}

/// Create a transition declaration guarded on the input.
///
/// # Example
///
/// ```
/// use statewright::builder::{guarded_transition, FsmBuilder};
///
/// let fsm = FsmBuilder::<(), u8>::new()
///     .state(|s| {
///         s.id(1)
///             .source()
///             .add_transition(guarded_transition(1, |i: &u8| *i == 1))
///             .add_transition(guarded_transition(2, |i: &u8| *i == 0))
///     })
///     .state(|s| s.id(2))
///     .build()
///     .unwrap();
///
/// assert!(fsm.source().transitions().iter().all(|t| t.is_guarded()));
/// ```
pub fn guarded_transition<C, I, F>(to: impl Into<StateId>, predicate: F) -> TransitionBuilder<C, I>
where
    F: Fn(&I) -> bool + Send + Sync + 'static,
{
    TransitionBuilder::new().to(to).when_input(predicate)
}
