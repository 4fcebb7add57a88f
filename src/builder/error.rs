//! Construction errors for graph builders.
//!
//! Every variant is a pre-execution failure: once an `Fsm` exists none of
//! these can occur.

use crate::core::StateId;
use std::fmt;
use thiserror::Error;

/// Assign-once fields of state and transition declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Label,
    Source,
    OnEnter,
    OnExit,
    Target,
    Guard,
    Action,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Id => "id",
            Self::Label => "label",
            Self::Source => "source",
            Self::OnEnter => "on_enter",
            Self::OnExit => "on_exit",
            Self::Target => "to",
            Self::Guard => "guard",
            Self::Action => "action",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when building a graph.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("{owner}: required field `{field}` is missing")]
    MissingField { owner: String, field: Field },

    #[error("{owner}: field `{field}` is already set")]
    FieldAlreadySet { owner: String, field: Field },

    #[error("only one initial state allowed: {duplicate} is marked as source after {existing}")]
    DuplicateSource { existing: String, duplicate: String },

    #[error("duplicate state id {id}: {duplicate} replaces {existing}")]
    DuplicateStateId {
        id: StateId,
        existing: String,
        duplicate: String,
    },

    #[error("no states")]
    NoStates,

    #[error("no start state")]
    NoSourceState,

    #[error("transition {from} -> {to} targets undefined state {to}")]
    UnknownTarget { from: StateId, to: StateId },

    #[error("state {from} has more than one transition to {to}: `{first}` and `{second}`")]
    DuplicateTarget {
        from: StateId,
        to: StateId,
        first: String,
        second: String,
    },

    #[error("{} construction errors: {}", .violations.len(), join(.violations))]
    Invalid { violations: Vec<BuildError> },
}

impl BuildError {
    /// Collapse accumulated violations: a single violation is reported as
    /// itself, several as `Invalid`.
    pub(crate) fn from_violations(mut violations: Vec<BuildError>) -> Self {
        if violations.len() == 1 {
            if let Some(only) = violations.pop() {
                return only;
            }
        }
        BuildError::Invalid { violations }
    }

    /// All individual violations carried by this error.
    pub fn violations(&self) -> Vec<&BuildError> {
        match self {
            BuildError::Invalid { violations } => violations.iter().collect(),
            other => vec![other],
        }
    }
}

fn join(violations: &[BuildError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_violation_is_not_wrapped() {
        let err = BuildError::from_violations(vec![BuildError::NoStates]);
        assert_eq!(err, BuildError::NoStates);
        assert_eq!(err.violations(), vec![&BuildError::NoStates]);
    }

    #[test]
    fn several_violations_are_wrapped() {
        let err = BuildError::from_violations(vec![
            BuildError::NoSourceState,
            BuildError::UnknownTarget {
                from: StateId::new(1),
                to: StateId::new(9),
            },
        ]);

        assert_eq!(err.violations().len(), 2);
        assert_eq!(
            err.to_string(),
            "2 construction errors: no start state; transition 1 -> 9 targets undefined state 9"
        );
    }

    #[test]
    fn messages_name_the_field() {
        let err = BuildError::FieldAlreadySet {
            owner: "state 1".to_string(),
            field: Field::OnEnter,
        };
        assert_eq!(err.to_string(), "state 1: field `on_enter` is already set");
    }
}
