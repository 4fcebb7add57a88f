//! Runners: live executions of a graph.
//!
//! A runner is created by `Fsm::start` and enters the source state before
//! `start` returns. A dedicated worker thread then consumes inputs from an
//! unbounded FIFO queue, so any number of producers may submit input while
//! hooks and guards of one runner never run concurrently.
//!
//! # Feeding
//!
//! - `Runner::feed` blocks until the input is processed.
//! - `Runner::feed_async` returns a `FeedHandle` that can be awaited,
//!   waited on, or cancelled.
//! - `Runner::feed_stream` drains a `futures::Stream` of inputs on a tokio
//!   task.
//!
//! # Termination
//!
//! A runner ends when it reaches a sink state, when processing an input
//! fails, or when `stop` is called. Afterwards every feed fails with
//! `RunnerError::NotRunning`, while the current state and context remain
//! readable.
//!
//! # Example
//!
//! ```rust
//! use statewright::Fsm;
//!
//! let fsm = Fsm::<u32, u8>::builder()
//!     .state(|s| {
//!         s.id(1)
//!             .source()
//!             .transition(|t| {
//!                 t.to(1).when_input(|i| *i != 0).action(|_, s| {
//!                     *s.context_mut() += 1;
//!                     Ok(())
//!                 })
//!             })
//!             .transition(|t| t.to(2).when_input(|i| *i == 0))
//!     })
//!     .state(|s| s.id(2).label("done"))
//!     .build()
//!     .unwrap();
//!
//! let runner = fsm.start(0).unwrap();
//! runner.feed(4).unwrap();
//! runner.feed(7).unwrap();
//! runner.feed(0).unwrap();
//!
//! assert!(!runner.is_started());
//! assert_eq!(runner.current_state().label(), Some("done"));
//! assert_eq!(runner.current_context(), 2);
//! ```

mod error;
mod handle;
mod machine;
mod worker;

pub use error::{HookPhase, RunnerError};
pub use handle::FeedHandle;
pub use machine::Runner;
