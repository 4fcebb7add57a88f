//! Labeled, optionally guarded transitions between states.

use super::guard::Guard;
use super::hook::{Action, HookResult, Session};
use super::state::StateId;
use std::fmt;

/// An outgoing edge of a state.
///
/// Identity is the owning state's id plus the target id; a state never
/// owns two transitions with the same target.
pub struct Transition<C, I> {
    pub(crate) from: StateId,
    pub(crate) to: StateId,
    pub(crate) label: Option<String>,
    pub(crate) guard: Option<Guard<C, I>>,
    pub(crate) action: Option<Action<C, I>>,
}

impl<C, I> Transition<C, I> {
    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    /// Evaluate the guard for `input`. Unguarded transitions always accept.
    pub fn accepts(&self, input: &I, session: &Session<'_, C, I>) -> bool {
        self.guard.as_ref().is_none_or(|g| g.check(input, session))
    }

    pub(crate) fn run_action(&self, session: &mut Session<'_, C, I>) -> HookResult {
        match &self.action {
            Some(action) => action.run(self, session),
            None => Ok(()),
        }
    }
}

impl<C, I> fmt::Debug for Transition<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("label", &self.label)
            .field("guarded", &self.guard.is_some())
            .field("action", &self.action.is_some())
            .finish()
    }
}

impl<C, I> fmt::Display for Transition<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} -[{label}]-> {}", self.from, self.to),
            None => write!(f, "{} -> {}", self.from, self.to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hook::Session;
    use crate::core::state::State;
    use uuid::Uuid;

    fn edge(guard: Option<Guard<u32, u8>>, action: Option<Action<u32, u8>>) -> Transition<u32, u8> {
        Transition {
            from: StateId::new(1),
            to: StateId::new(2),
            label: Some("flip".to_string()),
            guard,
            action,
        }
    }

    fn owner() -> State<u32, u8> {
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
    fn unguarded_transition_accepts_everything() {
        let state = owner();
        let mut ctx = 0;
        let session = Session::new(Uuid::nil(), &state, &mut ctx, None);
        let t = edge(None, None);
        assert!(t.accepts(&0, &session));
        assert!(t.accepts(&9, &session));
    }

    #[test]
    fn guard_decides_acceptance() {
        let state = owner();
        let mut ctx = 0;
        let session = Session::new(Uuid::nil(), &state, &mut ctx, None);
        let t = edge(Some(Guard::new(|input: &u8, _| *input == 1)), None);
        assert!(t.accepts(&1, &session));
        assert!(!t.accepts(&0, &session));
    }

    #[test]
    fn action_receives_transition_and_context() {
        let state = owner();
        let mut ctx = 0;
        let t = edge(
            None,
            Some(Action::new(|t: &Transition<u32, u8>, s: &mut Session<'_, u32, u8>| {
                *s.context_mut() += t.to().value();
                Ok(())
            })),
        );
        let mut session = Session::new(Uuid::nil(), &state, &mut ctx, None);
        t.run_action(&mut session).unwrap();
        assert_eq!(ctx, 2);
    }

    #[test]
    fn display_includes_label() {
        assert_eq!(edge(None, None).to_string(), "1 -[flip]-> 2");
    }
}
