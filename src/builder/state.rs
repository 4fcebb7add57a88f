//! Builder for one state declaration.

use crate::builder::error::{BuildError, Field};
use crate::builder::transition::{assign, TransitionBuilder};
use crate::core::{Hook, HookResult, Session, State, StateId};

/// Accumulates one state declaration and its outgoing transitions.
pub struct StateBuilder<C, I> {
    id: Option<StateId>,
    label: Option<String>,
    source: Option<()>,
    on_enter: Option<Hook<C, I>>,
    on_exit: Option<Hook<C, I>>,
    transitions: Vec<TransitionBuilder<C, I>>,
    conflicts: Vec<Field>,
}

impl<C, I> StateBuilder<C, I> {
    pub fn new() -> Self {
        Self {
            id: None,
            label: None,
            source: None,
            on_enter: None,
            on_exit: None,
            transitions: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    /// Set the state id (required).
    pub fn id(mut self, id: impl Into<StateId>) -> Self {
        assign(&mut self.id, id.into(), Field::Id, &mut self.conflicts);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        assign(&mut self.label, label.into(), Field::Label, &mut self.conflicts);
        self
    }

    /// Mark this state as the graph's entry state.
    pub fn source(mut self) -> Self {
        assign(&mut self.source, (), Field::Source, &mut self.conflicts);
        self
    }

    pub fn enter_hook(mut self, hook: Hook<C, I>) -> Self {
        assign(&mut self.on_enter, hook, Field::OnEnter, &mut self.conflicts);
        self
    }

    pub fn exit_hook(mut self, hook: Hook<C, I>) -> Self {
        assign(&mut self.on_exit, hook, Field::OnExit, &mut self.conflicts);
        self
    }

    /// Run `f` whenever the runner enters this state.
    pub fn on_enter<F>(self, f: F) -> Self
    where
        F: Fn(&mut Session<'_, C, I>) -> HookResult + Send + Sync + 'static,
    {
        self.enter_hook(Hook::new(f))
    }

    /// Run `f` whenever the runner is about to leave this state.
    pub fn on_exit<F>(self, f: F) -> Self
    where
        F: Fn(&mut Session<'_, C, I>) -> HookResult + Send + Sync + 'static,
    {
        self.exit_hook(Hook::new(f))
    }

    /// Declare an outgoing transition.
    ///
    /// ```rust
    /// use statewright::builder::StateBuilder;
    ///
    /// let state = StateBuilder::<(), u8>::new()
    ///     .id(1)
    ///     .source()
    ///     .transition(|t| t.to(2).when_input(|i| *i == 0));
    /// # let _ = state;
    /// ```
    pub fn transition<F>(self, declare: F) -> Self
    where
        F: FnOnce(TransitionBuilder<C, I>) -> TransitionBuilder<C, I>,
    {
        self.add_transition(declare(TransitionBuilder::new()))
    }

    pub fn add_transition(mut self, transition: TransitionBuilder<C, I>) -> Self {
        self.transitions.push(transition);
        self
    }

    pub(crate) fn is_source(&self) -> bool {
        self.source.is_some()
    }

    /// Human readable name of the declaration at `index`, stable even when
    /// the id is missing or duplicated.
    pub(crate) fn describe(&self, index: usize) -> String {
        let mut name = format!("state declaration #{index}");
        if let Some(id) = self.id {
            name.push_str(&format!(" (id {id}"));
            if let Some(label) = &self.label {
                name.push_str(&format!(", label {label:?}"));
            }
            name.push(')');
        } else if let Some(label) = &self.label {
            name.push_str(&format!(" (label {label:?})"));
        }
        name
    }

    /// Materialize the state and its transitions, reporting every
    /// declaration error at once.
    pub(crate) fn build(self, index: usize) -> Result<State<C, I>, Vec<BuildError>> {
        let owner = self.describe(index);
        let mut errors: Vec<BuildError> = self
            .conflicts
            .iter()
            .map(|field| BuildError::FieldAlreadySet {
                owner: owner.clone(),
                field: *field,
            })
            .collect();

        if self.id.is_none() {
            errors.push(BuildError::MissingField {
                owner: owner.clone(),
                field: Field::Id,
            });
        }

        let mut transitions = Vec::with_capacity(self.transitions.len());
        for transition in self.transitions {
            match transition.build(self.id) {
                Ok(t) => transitions.push(t),
                Err(mut e) => errors.append(&mut e),
            }
        }

        match self.id {
            Some(id) if errors.is_empty() => Ok(State {
                id,
                label: self.label,
                is_source: self.source.is_some(),
                transitions,
                on_enter: self.on_enter,
                on_exit: self.on_exit,
            }),
            _ => Err(errors),
        }
    }
}

impl<C, I> Default for StateBuilder<C, I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_id() {
        let errors = StateBuilder::<(), u8>::new().label("lost").build(0).err().unwrap();

        assert_eq!(
            errors,
            vec![BuildError::MissingField {
                owner: "state declaration #0 (label \"lost\")".to_string(),
                field: Field::Id,
            }]
        );
    }

    #[test]
    fn id_set_twice_is_distinct_from_missing() {
        let errors = StateBuilder::<(), u8>::new().id(1).id(2).build(0).err().unwrap();

        assert_eq!(
            errors,
            vec![BuildError::FieldAlreadySet {
                owner: "state declaration #0 (id 1)".to_string(),
                field: Field::Id,
            }]
        );
    }

    #[test]
    fn hooks_are_assign_once() {
        let errors = StateBuilder::<(), u8>::new()
            .id(1)
            .on_enter(|_| Ok(()))
            .enter_hook(Hook::unit(|| Ok(())))
            .on_exit(|_| Ok(()))
            .on_exit(|_| Ok(()))
            .build(0)
            .err()
            .unwrap();

        let fields: Vec<Field> = errors
            .iter()
            .filter_map(|e| match e {
                BuildError::FieldAlreadySet { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        assert_eq!(fields, vec![Field::OnEnter, Field::OnExit]);
    }

    #[test]
    fn transition_errors_surface_through_state() {
        let errors = StateBuilder::<(), u8>::new()
            .id(1)
            .transition(|t| t.label("no target"))
            .build(0)
            .err()
            .unwrap();

        assert!(matches!(
            errors.as_slice(),
            [BuildError::MissingField {
                field: Field::Target,
                ..
            }]
        ));
    }

    #[test]
    fn state_builds_with_transitions() {
        let state = StateBuilder::<(), u8>::new()
            .id(1)
            .label("even")
            .source()
            .transition(|t| t.to(1).when_input(|i| *i == 1))
            .transition(|t| t.to(2).when_input(|i| *i == 0))
            .build(0)
            .unwrap();

        assert_eq!(state.id(), StateId::new(1));
        assert_eq!(state.label(), Some("even"));
        assert!(state.is_source());
        assert!(!state.is_sink());
        assert_eq!(state.transitions().len(), 2);
        assert_eq!(state.transitions()[1].to(), StateId::new(2));
    }
}
