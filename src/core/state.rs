//! State identity and the immutable `State` value.
//!
//! A `State` owns its outgoing transitions and its enter/exit hooks.
//! Whether a state is a sink is derived from its transitions, never stored.

use super::hook::Hook;
use super::transition::Transition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a state, unique within one graph.
///
/// Ordering is numeric and stable, which keeps graph iteration
/// deterministic.
///
/// # Example
///
/// ```rust
/// use statewright::core::StateId;
///
/// let a = StateId::new(1);
/// let b: StateId = 2.into();
/// assert!(a < b);
/// assert_eq!(a.to_string(), "1");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u32);

impl StateId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for StateId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state of a validated graph.
///
/// Generic over the runner context `C` and the input type `I` because the
/// hooks it owns are invoked with both.
pub struct State<C, I> {
    pub(crate) id: StateId,
    pub(crate) label: Option<String>,
    pub(crate) is_source: bool,
    pub(crate) transitions: Vec<Transition<C, I>>,
    pub(crate) on_enter: Option<Hook<C, I>>,
    pub(crate) on_exit: Option<Hook<C, I>>,
}

impl<C, I> State<C, I> {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// True for the unique entry state of the graph.
    pub fn is_source(&self) -> bool {
        self.is_source
    }

    /// True when the state has no outgoing transitions.
    ///
    /// Reaching a sink ends the runner.
    pub fn is_sink(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Outgoing transitions in declaration order.
    pub fn transitions(&self) -> &[Transition<C, I>] {
        &self.transitions
    }

    /// The outgoing transition targeting `to`, if one exists.
    pub fn transition_to(&self, to: StateId) -> Option<&Transition<C, I>> {
        self.transitions.iter().find(|t| t.to == to)
    }

    pub fn has_enter_hook(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_exit_hook(&self) -> bool {
        self.on_exit.is_some()
    }

    /// Label if present, otherwise the numeric id. Used in diagnostics.
    pub fn name(&self) -> String {
        match &self.label {
            Some(label) => format!("{label}({})", self.id),
            None => self.id.to_string(),
        }
    }
}

impl<C, I> fmt::Debug for State<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("is_source", &self.is_source)
            .field("transitions", &self.transitions)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

impl<C, I> fmt::Display for State<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
