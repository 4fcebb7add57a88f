//! Builder for one outgoing transition of a state.

use crate::builder::error::{BuildError, Field};
use crate::core::{Action, Guard, HookResult, Session, StateId, Transition};

/// Accumulates one transition declaration.
///
/// Every field is assign-once. A second assignment is remembered and
/// reported by `FsmBuilder::build` instead of panicking mid-declaration.
pub struct TransitionBuilder<C, I> {
    to: Option<StateId>,
    label: Option<String>,
    guard: Option<Guard<C, I>>,
    action: Option<Action<C, I>>,
    conflicts: Vec<Field>,
}

impl<C, I> TransitionBuilder<C, I> {
    pub fn new() -> Self {
        Self {
            to: None,
            label: None,
            guard: None,
            action: None,
            conflicts: Vec::new(),
        }
    }

    /// Set the target state (required).
    pub fn to(mut self, id: impl Into<StateId>) -> Self {
        assign(&mut self.to, id.into(), Field::Target, &mut self.conflicts);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        assign(&mut self.label, label.into(), Field::Label, &mut self.conflicts);
        self
    }

    /// Add a guard (optional). Without one the transition always matches.
    pub fn guard(mut self, guard: Guard<C, I>) -> Self {
        assign(&mut self.guard, guard, Field::Guard, &mut self.conflicts);
        self
    }

    /// Add a guard over the input and the live session.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&I, &Session<'_, C, I>) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Add a guard that only looks at the input.
    pub fn when_input<F>(self, predicate: F) -> Self
    where
        F: Fn(&I) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::on_input(predicate))
    }

    pub fn action_hook(mut self, action: Action<C, I>) -> Self {
        assign(&mut self.action, action, Field::Action, &mut self.conflicts);
        self
    }

    /// Run `f` when this transition is taken.
    pub fn action<F>(self, f: F) -> Self
    where
        F: Fn(&Transition<C, I>, &mut Session<'_, C, I>) -> HookResult + Send + Sync + 'static,
    {
        self.action_hook(Action::new(f))
    }

    pub(crate) fn describe(&self, from: Option<StateId>) -> String {
        let from = from.map_or_else(|| "?".to_string(), |id| id.to_string());
        let to = self.to.map_or_else(|| "?".to_string(), |id| id.to_string());
        format!("transition {from} -> {to}")
    }

    /// Materialize the transition once its owner's id is known.
    pub(crate) fn build(self, from: Option<StateId>) -> Result<Transition<C, I>, Vec<BuildError>> {
        let owner = self.describe(from);
        let mut errors: Vec<BuildError> = self
            .conflicts
            .iter()
            .map(|field| BuildError::FieldAlreadySet {
                owner: owner.clone(),
                field: *field,
            })
            .collect();

        if self.to.is_none() {
            errors.push(BuildError::MissingField {
                owner: owner.clone(),
                field: Field::Target,
            });
        }

        match (from, self.to) {
            (Some(from), Some(to)) if errors.is_empty() => Ok(Transition {
                from,
                to,
                label: self.label,
                guard: self.guard,
                action: self.action,
            }),
            _ => Err(errors),
        }
    }
}

impl<C, I> Default for TransitionBuilder<C, I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Set an assign-once slot, remembering the field on a second assignment.
pub(crate) fn assign<T>(slot: &mut Option<T>, value: T, field: Field, conflicts: &mut Vec<Field>) {
    if slot.is_some() {
        conflicts.push(field);
    } else {
        *slot = Some(value);
    }
}
