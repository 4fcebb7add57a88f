//! Structural validation of a graph using Validation.
//!
//! Every check runs and every violation is reported, rather than stopping
//! at the first problem.

use crate::builder::BuildError;
use crate::core::{State, StateId};
use std::collections::{BTreeMap, BTreeSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub(crate) type GraphValidation = Validation<(), NonEmptyVec<BuildError>>;

/// Check the graph invariants over states keyed by id.
pub(crate) fn validate<C, I>(states: &BTreeMap<StateId, State<C, I>>) -> GraphValidation {
    if states.is_empty() {
        return Validation::fail(BuildError::NoStates);
    }

    let checks = vec![
        single_source(states),
        known_targets(states),
        distinct_targets(states),
    ];
    Validation::all_vec(checks).map(|_| ())
}

fn single_source<C, I>(states: &BTreeMap<StateId, State<C, I>>) -> GraphValidation {
    let sources: Vec<&State<C, I>> = states.values().filter(|s| s.is_source()).collect();
    match sources.as_slice() {
        [] => Validation::fail(BuildError::NoSourceState),
        [_] => Validation::success(()),
        [first, rest @ ..] => {
            let checks = rest
                .iter()
                .map(|extra| {
                    Validation::fail(BuildError::DuplicateSource {
                        existing: first.name(),
                        duplicate: extra.name(),
                    })
                })
                .collect::<Vec<GraphValidation>>();
            Validation::all_vec(checks).map(|_| ())
        }
    }
}

fn known_targets<C, I>(states: &BTreeMap<StateId, State<C, I>>) -> GraphValidation {
    let checks = states
        .values()
        .flat_map(|s| s.transitions())
        .map(|t| {
            if states.contains_key(&t.to()) {
                Validation::success(())
            } else {
                Validation::fail(BuildError::UnknownTarget {
                    from: t.from(),
                    to: t.to(),
                })
            }
        })
        .collect::<Vec<GraphValidation>>();
    Validation::all_vec(checks).map(|_| ())
}

fn distinct_targets<C, I>(states: &BTreeMap<StateId, State<C, I>>) -> GraphValidation {
    let mut checks: Vec<GraphValidation> = Vec::new();
    for state in states.values() {
        let mut seen = BTreeSet::new();
        for (index, transition) in state.transitions().iter().enumerate() {
            if seen.insert(transition.to()) {
                continue;
            }
            let first = state.transitions()[..index]
                .iter()
                .find(|t| t.to() == transition.to())
                .map(ToString::to_string)
                .unwrap_or_default();
            checks.push(Validation::fail(BuildError::DuplicateTarget {
                from: state.id(),
                to: transition.to(),
                first,
                second: transition.to_string(),
            }));
        }
    }
    Validation::all_vec(checks).map(|_| ())
}

/// Flatten a failed validation into a single error.
pub(crate) fn into_result(validation: GraphValidation) -> Result<(), BuildError> {
    match validation {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(BuildError::from_violations(
            errors.iter().cloned().collect(),
        )),
    }
}
