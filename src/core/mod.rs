//! Graph model types.
//!
//! This module contains the immutable value types of a graph:
//! - State identity and states
//! - Transitions and their guards
//! - Hooks and the session view they receive
//! - Runner transition history records
//!
//! Nothing here executes a machine; the runner drives these types.

mod guard;
mod history;
mod hook;
mod state;
mod transition;

pub use guard::Guard;
pub use history::{StateHistory, TransitionRecord};
pub use hook::{Action, Hook, HookError, HookResult, Session};
pub use state::{State, StateId};
pub use transition::Transition;
