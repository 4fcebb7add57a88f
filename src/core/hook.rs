//! Side-effect hooks and the live session view they receive.
//!
//! Every hook takes the full session. The no-argument variants are thin
//! adapters that ignore it, so hook storage has a single shape.

use super::state::State;
use super::transition::Transition;
use std::sync::Arc;
use uuid::Uuid;

/// Error type hooks may return. Any error terminates the runner.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

pub type HookResult = Result<(), HookError>;

/// The live view of a runner handed to guards and hooks.
///
/// Sessions only exist on the runner's worker (or inside `start`), so the
/// context is borrowed mutably without any further synchronization.
pub struct Session<'a, C, I> {
    runner_id: Uuid,
    state: &'a State<C, I>,
    context: &'a mut C,
    input: Option<&'a I>,
}

impl<'a, C, I> Session<'a, C, I> {
    pub(crate) fn new(
        runner_id: Uuid,
        state: &'a State<C, I>,
        context: &'a mut C,
        input: Option<&'a I>,
    ) -> Self {
        Self {
            runner_id,
            state,
            context,
            input,
        }
    }

    pub fn runner_id(&self) -> Uuid {
        self.runner_id
    }

    /// The runner's current state.
    ///
    /// During exit hooks, guards and transition actions this is still the
    /// state being left; during enter hooks it is the state being entered.
    pub fn state(&self) -> &'a State<C, I> {
        self.state
    }

    pub fn context(&self) -> &C {
        &*self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut *self.context
    }

    /// The input being processed. `None` while entering the source state.
    pub fn input(&self) -> Option<&'a I> {
        self.input
    }

    pub fn available_transitions(&self) -> &'a [Transition<C, I>] {
        self.state.transitions()
    }
}

type HookFn<C, I> = dyn Fn(&mut Session<'_, C, I>) -> HookResult + Send + Sync;
type ActionFn<C, I> = dyn Fn(&Transition<C, I>, &mut Session<'_, C, I>) -> HookResult + Send + Sync;

/// Enter or exit hook of a state.
pub struct Hook<C, I> {
    f: Arc<HookFn<C, I>>,
}

impl<C, I> Hook<C, I> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Session<'_, C, I>) -> HookResult + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Adapter for hooks that do not need the session.
    pub fn unit<F>(f: F) -> Self
    where
        F: Fn() -> HookResult + Send + Sync + 'static,
    {
        Self::new(move |_| f())
    }

    pub fn run(&self, session: &mut Session<'_, C, I>) -> HookResult {
        (self.f)(session)
    }
}

impl<C, I> Clone for Hook<C, I> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

/// Side effect attached to a transition.
pub struct Action<C, I> {
    f: Arc<ActionFn<C, I>>,
}

impl<C, I> Action<C, I> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Transition<C, I>, &mut Session<'_, C, I>) -> HookResult + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Adapter for actions that need neither the transition nor the session.
    pub fn unit<F>(f: F) -> Self
    where
        F: Fn() -> HookResult + Send + Sync + 'static,
    {
        Self::new(move |_, _| f())
    }

    pub fn run(&self, transition: &Transition<C, I>, session: &mut Session<'_, C, I>) -> HookResult {
        (self.f)(transition, session)
    }
}

impl<C, I> Clone for Action<C, I> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}
