//! The validated, immutable graph.
//!
//! An `Fsm` is stateless with respect to execution. It is cheap to clone
//! (the states live behind an `Arc`) and can be started any number of
//! times; every runner gets its own context and current state.

mod validation;

use crate::builder::{BuildError, FsmBuilder};
use crate::config::RunnerConfig;
use crate::core::{State, StateId};
use crate::observer::{NoopObserver, Observer};
use crate::runner::{Runner, RunnerError};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

struct Graph<C, I> {
    states: BTreeMap<StateId, State<C, I>>,
    source: StateId,
}

/// A validated finite-state-machine graph.
pub struct Fsm<C, I> {
    graph: Arc<Graph<C, I>>,
    config: RunnerConfig,
}

impl<C, I> Fsm<C, I> {
    /// Start declaring a graph.
    pub fn builder() -> FsmBuilder<C, I> {
        FsmBuilder::new()
    }

    /// Validate `states` and take ownership of them.
    ///
    /// State ids are expected to be unique; the builder guarantees this.
    pub(crate) fn new(states: Vec<State<C, I>>, config: RunnerConfig) -> Result<Self, BuildError> {
        let states: BTreeMap<StateId, State<C, I>> =
            states.into_iter().map(|s| (s.id(), s)).collect();
        validation::into_result(validation::validate(&states))?;

        let source = states
            .values()
            .find(|s| s.is_source())
            .map(State::id)
            .ok_or(BuildError::NoSourceState)?;

        Ok(Self {
            graph: Arc::new(Graph { states, source }),
            config,
        })
    }

    /// The unique entry state.
    pub fn source(&self) -> &State<C, I> {
        self.resolve(self.graph.source)
    }

    pub fn state(&self, id: impl Into<StateId>) -> Option<&State<C, I>> {
        self.graph.states.get(&id.into())
    }

    /// All states ordered by id.
    pub fn states(&self) -> impl Iterator<Item = &State<C, I>> {
        self.graph.states.values()
    }

    pub fn len(&self) -> usize {
        self.graph.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.states.is_empty()
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// The same graph with a different default runner configuration.
    pub fn with_config(&self, config: RunnerConfig) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
            config,
        }
    }

    /// Look up a state the graph is known to contain.
    ///
    /// Transition targets and the source are validated at build time, so
    /// the runner only resolves ids that exist.
    pub(crate) fn resolve(&self, id: StateId) -> &State<C, I> {
        &self.graph.states[&id]
    }
}

impl<C, I> Fsm<C, I>
where
    C: Send + 'static,
    I: fmt::Debug + Send + 'static,
{
    /// Start a runner without an observer.
    ///
    /// The source state is entered before this returns.
    pub fn start(&self, context: C) -> Result<Runner<C, I>, RunnerError> {
        self.start_with(context, Arc::new(NoopObserver))
    }

    /// Start a runner that reports lifecycle events to `observer`.
    pub fn start_with(
        &self,
        context: C,
        observer: Arc<dyn Observer<C, I>>,
    ) -> Result<Runner<C, I>, RunnerError> {
        self.start_with_config(context, observer, self.config.clone())
    }

    /// Start a runner with a configuration overriding the graph's.
    pub fn start_with_config(
        &self,
        context: C,
        observer: Arc<dyn Observer<C, I>>,
        config: RunnerConfig,
    ) -> Result<Runner<C, I>, RunnerError> {
        Runner::start(self.clone(), context, observer, config)
    }
}

impl<C, I> Clone for Fsm<C, I> {
    fn clone(&self) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
            config: self.config.clone(),
        }
    }
}

impl<C, I> fmt::Debug for Fsm<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("source", &self.graph.source)
            .field("states", &self.graph.states.values().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}
