//! Builder for whole graphs.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::config::RunnerConfig;
use crate::core::{State, StateId};
use crate::graph::Fsm;
use std::collections::BTreeMap;

/// Builder for constructing a validated `Fsm` with a fluent API.
///
/// # Example
///
/// ```rust
/// use statewright::builder::FsmBuilder;
///
/// let fsm = FsmBuilder::<u32, u8>::new()
///     .state(|s| s.id(1).source().transition(|t| t.to(2)))
///     .state(|s| s.id(2).label("done"))
///     .build()
///     .unwrap();
///
/// assert_eq!(fsm.source().id().value(), 1);
/// ```
pub struct FsmBuilder<C, I> {
    states: Vec<StateBuilder<C, I>>,
    source: Option<usize>,
    errors: Vec<BuildError>,
    config: RunnerConfig,
}

impl<C, I> FsmBuilder<C, I> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            source: None,
            errors: Vec::new(),
            config: RunnerConfig::default(),
        }
    }

    /// Declare a state.
    pub fn state<F>(self, declare: F) -> Self
    where
        F: FnOnce(StateBuilder<C, I>) -> StateBuilder<C, I>,
    {
        self.add_state(declare(StateBuilder::new()))
    }

    /// Add a state declaration.
    ///
    /// A second state marked as source is recorded as a
    /// `DuplicateSource` error and fails `build`.
    pub fn add_state(mut self, state: StateBuilder<C, I>) -> Self {
        let index = self.states.len();
        if state.is_source() {
            match self.source {
                Some(existing) => self.errors.push(BuildError::DuplicateSource {
                    existing: self.states[existing].describe(existing),
                    duplicate: state.describe(index),
                }),
                None => self.source = Some(index),
            }
        }
        self.states.push(state);
        self
    }

    /// Runner configuration attached to the built graph.
    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the graph.
    ///
    /// Declaration errors (missing or twice-assigned fields, second source)
    /// are reported first, then duplicate ids, then the structural checks
    /// performed by the graph itself.
    pub fn build(self) -> Result<Fsm<C, I>, BuildError> {
        let mut errors = self.errors;
        let mut names = Vec::with_capacity(self.states.len());
        let mut states = Vec::with_capacity(self.states.len());

        for (index, declaration) in self.states.into_iter().enumerate() {
            names.push(declaration.describe(index));
            match declaration.build(index) {
                Ok(state) => states.push(state),
                Err(mut e) => errors.append(&mut e),
            }
        }
        if !errors.is_empty() {
            return Err(BuildError::from_violations(errors));
        }

        let duplicates = duplicate_ids(&states, &names);
        if !duplicates.is_empty() {
            return Err(BuildError::from_violations(duplicates));
        }

        Fsm::new(states, self.config)
    }
}

impl<C, I> Default for FsmBuilder<C, I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Later declarations shadow earlier ones with the same id; every shadowing
/// is an error naming both declarations.
fn duplicate_ids<C, I>(states: &[State<C, I>], names: &[String]) -> Vec<BuildError> {
    let mut seen: BTreeMap<StateId, &str> = BTreeMap::new();
    let mut errors = Vec::new();
    for (state, name) in states.iter().zip(names) {
        if let Some(existing) = seen.insert(state.id(), name.as_str()) {
            errors.push(BuildError::DuplicateStateId {
                id: state.id(),
                existing: existing.to_string(),
                duplicate: name.clone(),
            });
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::error::Field;

    #[test]
    fn empty_builder_has_no_states() {
        let result = FsmBuilder::<(), u8>::new().build();
        assert_eq!(result.err(), Some(BuildError::NoStates));
    }

    #[test]
    fn missing_source_is_reported() {
        let result = FsmBuilder::<(), u8>::new().state(|s| s.id(1)).build();
        assert_eq!(result.err(), Some(BuildError::NoSourceState));
    }

    #[test]
    fn second_source_is_rejected() {
        let err = FsmBuilder::<(), u8>::new()
            .state(|s| s.id(1).source())
            .state(|s| s.id(2).source())
            .build()
            .err()
            .unwrap();

        assert_eq!(
            err,
            BuildError::DuplicateSource {
                existing: "state declaration #0 (id 1)".to_string(),
                duplicate: "state declaration #1 (id 2)".to_string(),
            }
        );
        assert!(err.to_string().contains("only one initial state"));
    }

    #[test]
    fn duplicate_ids_name_both_declarations() {
        let err = FsmBuilder::<(), u8>::new()
            .state(|s| s.id(1).source().label("first"))
            .state(|s| s.id(1).label("second"))
            .build()
            .err()
            .unwrap();

        assert_eq!(
            err,
            BuildError::DuplicateStateId {
                id: StateId::new(1),
                existing: "state declaration #0 (id 1, label \"first\")".to_string(),
                duplicate: "state declaration #1 (id 1, label \"second\")".to_string(),
            }
        );
    }

    #[test]
    fn declaration_errors_are_accumulated() {
        let err = FsmBuilder::<(), u8>::new()
            .state(|s| s.source().label("a").label("b"))
            .state(|s| s.id(2).transition(|t| t.label("x")))
            .build()
            .err()
            .unwrap();

        let violations = err.violations();
        assert_eq!(violations.len(), 3);
        assert!(violations
            .iter()
            .any(|e| matches!(e, BuildError::MissingField { field: Field::Id, .. })));
        assert!(violations
            .iter()
            .any(|e| matches!(e, BuildError::FieldAlreadySet { field: Field::Label, .. })));
        assert!(violations
            .iter()
            .any(|e| matches!(e, BuildError::MissingField { field: Field::Target, .. })));
    }

    #[test]
    fn config_is_carried_into_graph() {
        let fsm = FsmBuilder::<(), u8>::new()
            .state(|s| s.id(1).source())
            .config(RunnerConfig::default().verbose(true))
            .build()
            .unwrap();

        assert!(fsm.config().verbose);
    }
}
