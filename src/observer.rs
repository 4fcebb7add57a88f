//! Passive lifecycle notifications.
//!
//! A runner calls its observer synchronously from the worker, in the order
//! the runner executes. Implementations must return promptly: a blocked
//! observer stalls the runner. The context is not locked while observers
//! run, so an observer may read it through `Runner::current_context`.

use crate::core::{State, Transition};
use crate::runner::RunnerError;
use tracing::{debug, info, warn};

/// Receiver of runner lifecycle events. Every method defaults to a no-op.
pub trait Observer<C, I>: Send + Sync {
    fn on_started(&self) {}

    fn on_ended(&self) {}

    fn on_state_enter(&self, _state: &State<C, I>) {}

    fn on_state_exit(&self, _state: &State<C, I>) {}

    fn on_transition(&self, _transition: &Transition<C, I>) {}

    fn on_error(&self, _error: &RunnerError) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<C, I> Observer<C, I> for NoopObserver {}

/// Observer that logs every event through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    name: String,
}

impl TracingObserver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<C, I> Observer<C, I> for TracingObserver {
    fn on_started(&self) {
        info!(fsm = %self.name, "runner started");
    }

    fn on_ended(&self) {
        info!(fsm = %self.name, "runner ended");
    }

    fn on_state_enter(&self, state: &State<C, I>) {
        debug!(fsm = %self.name, state = %state, "entered state");
    }

    fn on_state_exit(&self, state: &State<C, I>) {
        debug!(fsm = %self.name, state = %state, "exited state");
    }

    fn on_transition(&self, transition: &Transition<C, I>) {
        debug!(fsm = %self.name, transition = %transition, "took transition");
    }

    fn on_error(&self, error: &RunnerError) {
        warn!(fsm = %self.name, error = %error, "runner failed");
    }
}
