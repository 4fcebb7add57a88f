//! Execution errors raised by a runner.

use crate::core::{HookError, StateId};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The hook that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Enter,
    Exit,
    Action,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter => f.write_str("enter"),
            Self::Exit => f.write_str("exit"),
            Self::Action => f.write_str("action"),
        }
    }
}

/// Errors that can occur while a runner executes.
///
/// Every error other than `NotRunning`, `Cancelled`, `Reentrant` and
/// `NoRuntime` terminates the runner.
#[derive(Debug, Clone, Error)]
pub enum RunnerError {
    #[error("runner is not running")]
    NotRunning,

    #[error("no transition candidates for input {input} at state {state}")]
    NoCandidates { input: String, state: StateId },

    #[error("multiple transition candidates for input {input} at state {state}: {}", ids(.candidates))]
    MultipleCandidates {
        input: String,
        state: StateId,
        candidates: Vec<StateId>,
    },

    #[error("{phase} hook failed at state {state}: {cause}")]
    Hook {
        phase: HookPhase,
        state: StateId,
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },

    #[error("input cancelled before the runner processed it")]
    Cancelled,

    #[error("blocking feed called from the runner's own worker")]
    Reentrant,

    #[error("failed to spawn runner worker: {0}")]
    Spawn(Arc<std::io::Error>),

    #[error("runner worker terminated unexpectedly")]
    WorkerLost,

    #[error("streamed feed requires a tokio runtime")]
    NoRuntime,
}

impl RunnerError {
    pub(crate) fn hook(phase: HookPhase, state: StateId, cause: HookError) -> Self {
        RunnerError::Hook {
            phase,
            state,
            cause: Arc::from(cause),
        }
    }

    /// True for errors that ended the runner, as opposed to errors that
    /// only rejected one input.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RunnerError::NotRunning
                | RunnerError::Cancelled
                | RunnerError::Reentrant
                | RunnerError::NoRuntime
        )
    }
}

fn ids(candidates: &[StateId]) -> String {
    candidates
        .iter()
        .map(|id| format!("-> {id}"))
        .collect::<Vec<_>>()
        .join(", ")
}
