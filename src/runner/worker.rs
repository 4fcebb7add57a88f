//! The single consumer that executes one runner.
//!
//! The worker owns the receiving end of the input queue and is the only
//! code that moves the runner between states. Inputs are processed one at
//! a time in queue order.

use super::error::{HookPhase, RunnerError};
use super::handle::Reply;
use super::machine::Shared;
use crate::core::{Session, State, Transition, TransitionRecord};
use chrono::Utc;
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

pub(crate) struct Envelope<I> {
    pub(crate) input: I,
    pub(crate) reply: oneshot::Sender<Reply>,
}

pub(crate) enum Command<I> {
    Feed(Envelope<I>),
    Stop,
}

/// Why the worker left its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Stopped,
    Ended,
    Failed,
    Disconnected,
}

pub(crate) struct Worker<C, I> {
    shared: Arc<Shared<C, I>>,
    queue: mpsc::UnboundedReceiver<Command<I>>,
}

impl<C, I> Worker<C, I>
where
    C: Send + 'static,
    I: fmt::Debug + Send + 'static,
{
    pub(crate) fn new(shared: Arc<Shared<C, I>>, queue: mpsc::UnboundedReceiver<Command<I>>) -> Self {
        Self { shared, queue }
    }

    pub(crate) fn run(mut self) {
        let exit = self.serve();
        debug!(runner = %self.shared.id, ?exit, "runner worker exiting");
        if matches!(exit, Exit::Stopped | Exit::Disconnected) {
            self.shared.finish();
        }
        self.drain(exit);
    }

    fn serve(&mut self) -> Exit {
        while let Some(command) = self.queue.blocking_recv() {
            let envelope = match command {
                Command::Stop => return Exit::Stopped,
                Command::Feed(envelope) => envelope,
            };
            if self.shared.stopping.load(Ordering::SeqCst) {
                let _ = envelope.reply.send(Err(RunnerError::Cancelled));
                return Exit::Stopped;
            }
            if envelope.reply.is_closed() {
                if self.shared.config.verbose {
                    debug!(runner = %self.shared.id, input = ?envelope.input, "skipping withdrawn input");
                }
                continue;
            }

            match self.step(&envelope.input) {
                Ok(()) => {
                    let ended = self.shared.current_state().is_sink();
                    if ended {
                        self.shared.finish();
                    }
                    let _ = envelope.reply.send(Ok(()));
                    if ended {
                        return Exit::Ended;
                    }
                }
                Err(error) => {
                    warn!(runner = %self.shared.id, %error, "runner failed");
                    self.shared.observer.on_error(&error);
                    self.shared.finish();
                    let _ = envelope.reply.send(Err(error));
                    return Exit::Failed;
                }
            }
        }
        Exit::Disconnected
    }

    /// Resolve queued input that will never be processed.
    fn drain(&mut self, exit: Exit) {
        self.queue.close();
        let error = match exit {
            Exit::Stopped => RunnerError::Cancelled,
            _ => RunnerError::NotRunning,
        };
        let mut abandoned = 0usize;
        while let Ok(command) = self.queue.try_recv() {
            if let Command::Feed(envelope) = command {
                abandoned += 1;
                let _ = envelope.reply.send(Err(error.clone()));
            }
        }
        if abandoned > 0 {
            debug!(runner = %self.shared.id, abandoned, "abandoned queued input");
        }
    }

    /// Process one input: exit hook, guard evaluation, action, entry.
    ///
    /// The context is locked for each hook phase only, never while the
    /// observer is notified.
    fn step(&self, input: &I) -> Result<(), RunnerError> {
        let shared = &*self.shared;
        let state = shared.current_state();

        if shared.config.verbose {
            debug!(runner = %shared.id, state = %state, ?input, "accepted input");
        }

        let chosen = {
            let mut context = shared.context.lock();
            let mut session = Session::new(shared.id, state, &mut *context, Some(input));
            if let Some(hook) = &state.on_exit {
                hook.run(&mut session)
                    .map_err(|e| RunnerError::hook(HookPhase::Exit, state.id(), e))?;
            }
            select(state, input, &session)?
        };
        if shared.config.verbose {
            debug!(runner = %shared.id, transition = %chosen, "transition selected");
        }

        shared.observer.on_state_exit(state);
        {
            let mut context = shared.context.lock();
            let mut session = Session::new(shared.id, state, &mut *context, Some(input));
            chosen
                .run_action(&mut session)
                .map_err(|e| RunnerError::hook(HookPhase::Action, state.id(), e))?;
        }
        shared.observer.on_transition(chosen);

        let next = shared.fsm.resolve(chosen.to());
        shared.current.send_replace(next.id());
        shared.history.lock().record(TransitionRecord {
            from: state.id(),
            to: next.id(),
            label: chosen.label().map(str::to_string),
            timestamp: Utc::now(),
        });

        if let Some(hook) = &next.on_enter {
            let mut context = shared.context.lock();
            let mut session = Session::new(shared.id, next, &mut *context, Some(input));
            hook.run(&mut session)
                .map_err(|e| RunnerError::hook(HookPhase::Enter, next.id(), e))?;
        }
        shared.observer.on_state_enter(next);
        Ok(())
    }
}

/// Pick the single transition whose guard accepts `input`.
fn select<'a, C, I: fmt::Debug>(
    state: &'a State<C, I>,
    input: &I,
    session: &Session<'_, C, I>,
) -> Result<&'a Transition<C, I>, RunnerError> {
    let candidates: Vec<&Transition<C, I>> = state
        .transitions()
        .iter()
        .filter(|t| t.accepts(input, session))
        .collect();

    match candidates.as_slice() {
        [] => Err(RunnerError::NoCandidates {
            input: format!("{input:?}"),
            state: state.id(),
        }),
        [only] => Ok(*only),
        many => Err(RunnerError::MultipleCandidates {
            input: format!("{input:?}"),
            state: state.id(),
            candidates: many.iter().map(|t| t.to()).collect(),
        }),
    }
}

impl<C, I> Drop for Worker<C, I> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.shared.started.store(false, Ordering::SeqCst);
        }
    }
}
