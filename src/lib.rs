//! Statewright: validated state-machine graphs with concurrent runners
//!
//! Callers declare a directed graph of states and labeled transitions. Each
//! transition may be guarded by a predicate and each state or transition
//! may carry side-effect hooks. Building the graph checks every structural
//! invariant up front; a built `Fsm` is immutable and can be started any
//! number of times.
//!
//! # Core Concepts
//!
//! - **Fsm**: the validated, immutable graph
//! - **Runner**: one live execution bound to one context
//! - **Guard**: predicate deciding whether a transition accepts an input
//! - **Hook**: enter/exit/action side effect receiving the live session
//! - **Observer**: passive receiver of lifecycle notifications
//!
//! # Example
//!
//! ```rust
//! use statewright::Fsm;
//!
//! #[derive(Clone, Default)]
//! struct Parity {
//!     even_zeros: bool,
//! }
//!
//! let fsm = Fsm::<Parity, u8>::builder()
//!     .state(|s| {
//!         s.id(1)
//!             .source()
//!             .label("even")
//!             .on_enter(|s| {
//!                 s.context_mut().even_zeros = true;
//!                 Ok(())
//!             })
//!             .transition(|t| t.to(1).when_input(|i| *i == 1))
//!             .transition(|t| t.to(2).when_input(|i| *i == 0))
//!     })
//!     .state(|s| {
//!         s.id(2)
//!             .label("odd")
//!             .on_enter(|s| {
//!                 s.context_mut().even_zeros = false;
//!                 Ok(())
//!             })
//!             .transition(|t| t.to(2).when_input(|i| *i == 1))
//!             .transition(|t| t.to(1).when_input(|i| *i == 0))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let runner = fsm.start(Parity::default()).unwrap();
//! for digit in [1, 0, 0, 1] {
//!     runner.feed(digit).unwrap();
//! }
//! assert!(runner.current_context().even_zeros);
//! runner.stop();
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod graph;
pub mod observer;
pub mod runner;

// Re-export commonly used types
pub use builder::{BuildError, FsmBuilder};
pub use config::RunnerConfig;
pub use core::{Guard, Hook, HookResult, Session, State, StateId, Transition};
pub use graph::Fsm;
pub use observer::{NoopObserver, Observer, TracingObserver};
pub use runner::{FeedHandle, Runner, RunnerError};
