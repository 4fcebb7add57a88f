//! One live, stateful execution of a graph.

use super::error::{HookPhase, RunnerError};
use super::handle::{FeedHandle, Reply};
use super::worker::{Command, Envelope, Worker};
use crate::config::RunnerConfig;
use crate::core::{Session, State, StateHistory, StateId, Transition};
use crate::graph::Fsm;
use crate::observer::Observer;
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};
use uuid::Uuid;

/// State shared between the runner handles and the worker.
///
/// Only the worker (or `start`, before the worker exists) mutates the
/// context, the current state and the history.
pub(crate) struct Shared<C, I> {
    pub(crate) id: Uuid,
    pub(crate) fsm: Fsm<C, I>,
    pub(crate) config: RunnerConfig,
    pub(crate) observer: Arc<dyn Observer<C, I>>,
    pub(crate) context: Mutex<C>,
    pub(crate) current: watch::Sender<StateId>,
    pub(crate) history: Mutex<StateHistory>,
    pub(crate) started: AtomicBool,
    pub(crate) stopping: AtomicBool,
    ended: AtomicBool,
}

impl<C, I> Shared<C, I> {
    pub(crate) fn current_state(&self) -> &State<C, I> {
        let id = *self.current.borrow();
        self.fsm.resolve(id)
    }

    /// Mark the runner ended, notifying the observer exactly once.
    pub(crate) fn finish(&self) {
        self.started.store(false, Ordering::SeqCst);
        if !self.ended.swap(true, Ordering::SeqCst) {
            debug!(runner = %self.id, state = %self.current_state(), "runner ended");
            self.observer.on_ended();
        }
    }
}

struct Inner<C, I> {
    shared: Arc<Shared<C, I>>,
    queue: mpsc::UnboundedSender<Command<I>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_thread: Option<ThreadId>,
}

/// Handle to a running graph instance.
///
/// Handles are cheap to clone and may be used from any thread; every clone
/// feeds the same queue. Inputs are processed strictly in the order they
/// were enqueued across all handles.
pub struct Runner<C, I> {
    inner: Arc<Inner<C, I>>,
}

impl<C, I> Clone for Runner<C, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, I> Runner<C, I>
where
    C: Send + 'static,
    I: fmt::Debug + Send + 'static,
{
    /// Enter the source state and launch the worker.
    pub(crate) fn start(
        fsm: Fsm<C, I>,
        context: C,
        observer: Arc<dyn Observer<C, I>>,
        config: RunnerConfig,
    ) -> Result<Self, RunnerError> {
        let id = Uuid::new_v4();
        let source = fsm.source().id();
        let (current, _) = watch::channel(source);
        let shared = Arc::new(Shared {
            id,
            history: Mutex::new(StateHistory::with_limit(config.history_limit)),
            fsm,
            config,
            observer,
            context: Mutex::new(context),
            current,
            started: AtomicBool::new(true),
            stopping: AtomicBool::new(false),
            ended: AtomicBool::new(false),
        });
        debug!(runner = %id, %source, "starting runner");

        if let Err(error) = enter_source(&shared) {
            warn!(runner = %id, %error, "source state rejected entry");
            shared.observer.on_error(&error);
            shared.started.store(false, Ordering::SeqCst);
            shared.ended.store(true, Ordering::SeqCst);
            return Err(error);
        }
        shared.observer.on_started();
        shared.observer.on_state_enter(shared.current_state());

        let (queue, receiver) = mpsc::unbounded_channel();
        let (worker, worker_thread) = if shared.current_state().is_sink() {
            shared.finish();
            (None, None)
        } else {
            let handle = thread::Builder::new()
                .name(shared.config.thread_name(&id))
                .spawn({
                    let worker = Worker::new(Arc::clone(&shared), receiver);
                    move || worker.run()
                })
                .map_err(|e| {
                    let error = RunnerError::Spawn(Arc::new(e));
                    shared.observer.on_error(&error);
                    shared.finish();
                    error
                })?;
            let thread = handle.thread().id();
            (Some(handle), Some(thread))
        };

        Ok(Self {
            inner: Arc::new(Inner {
                shared,
                queue,
                worker: Mutex::new(worker),
                worker_thread,
            }),
        })
    }

    /// Feed one input and block until the worker has processed it.
    ///
    /// Must not be called from within an async runtime; use `feed_async`
    /// there.
    pub fn feed(&self, input: I) -> Result<(), RunnerError> {
        if self.on_worker_thread() {
            return Err(RunnerError::Reentrant);
        }
        let reply = self.enqueue(input)?;
        reply.blocking_recv().unwrap_or(Err(RunnerError::WorkerLost))
    }

    /// Feed one input without blocking.
    ///
    /// Any number of async feeds may be outstanding; they are still
    /// processed in submission order.
    pub fn feed_async(&self, input: I) -> FeedHandle {
        match self.enqueue(input) {
            Ok(reply) => FeedHandle::reply(reply),
            Err(error) => FeedHandle::ready(Err(error)),
        }
    }

    /// Feed every item of `inputs` in order, waiting for each to be
    /// processed before pulling the next.
    ///
    /// The stream is driven on the current tokio runtime. The handle
    /// completes when the stream ends or on the first error, and resolves
    /// with `RunnerError::NoRuntime` when called outside a runtime.
    pub fn feed_stream<S>(&self, inputs: S) -> FeedHandle
    where
        S: Stream<Item = I> + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            return FeedHandle::ready(Err(RunnerError::NoRuntime));
        };
        let runner = self.clone();
        FeedHandle::task(runtime.spawn(async move {
            let mut inputs = Box::pin(inputs);
            while let Some(input) = inputs.next().await {
                runner.feed_async(input).await?;
            }
            Ok(())
        }))
    }

    /// Stop the runner and wait for the worker to exit.
    ///
    /// Idempotent. Input queued but not yet processed resolves with
    /// `RunnerError::Cancelled`. Called from one of the runner's own hooks,
    /// the stop takes effect after the current input without waiting.
    pub fn stop(&self) {
        let shared = &self.inner.shared;
        if !shared.stopping.swap(true, Ordering::SeqCst) {
            debug!(runner = %shared.id, "stopping runner");
            shared.started.store(false, Ordering::SeqCst);
            if self.inner.queue.send(Command::Stop).is_err() {
                shared.finish();
            }
        }
        if self.on_worker_thread() {
            return;
        }
        let mut worker = self.inner.worker.lock();
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                warn!(runner = %shared.id, "runner worker panicked");
            }
        }
    }

    fn enqueue(&self, input: I) -> Result<oneshot::Receiver<Reply>, RunnerError> {
        if !self.is_started() {
            return Err(RunnerError::NotRunning);
        }
        let (reply, receiver) = oneshot::channel();
        self.inner
            .queue
            .send(Command::Feed(Envelope { input, reply }))
            .map_err(|_| RunnerError::NotRunning)?;
        Ok(receiver)
    }
}

impl<C, I> Runner<C, I> {
    /// Identifier of this runner, also used in logs and the worker name.
    pub fn id(&self) -> Uuid {
        self.inner.shared.id
    }

    /// False once the runner has been stopped, has failed, or has reached
    /// a sink state.
    pub fn is_started(&self) -> bool {
        self.inner.shared.started.load(Ordering::SeqCst)
    }

    /// The graph this runner executes.
    pub fn fsm(&self) -> &Fsm<C, I> {
        &self.inner.shared.fsm
    }

    /// Configuration in effect for this runner.
    pub fn config(&self) -> &RunnerConfig {
        &self.inner.shared.config
    }

    /// Id of the current state.
    pub fn current_state_id(&self) -> StateId {
        *self.inner.shared.current.borrow()
    }

    /// The current state; frozen at its last value once the runner ends.
    pub fn current_state(&self) -> &State<C, I> {
        self.inner.shared.current_state()
    }

    /// Outgoing transitions of the current state, empty for a sink.
    pub fn available_transitions(&self) -> &[Transition<C, I>] {
        self.current_state().transitions()
    }

    /// Receiver that observes every state change.
    pub fn watch_state(&self) -> watch::Receiver<StateId> {
        self.inner.shared.current.subscribe()
    }

    /// Inspect the context.
    ///
    /// Waits while a hook or guard of this runner is running. Calling it
    /// from a hook deadlocks; hooks get the context through their session.
    pub fn with_context<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let context = self.inner.shared.context.lock();
        f(&*context)
    }

    /// Clone of the context; frozen at its last value once the runner ends.
    pub fn current_context(&self) -> C
    where
        C: Clone,
    {
        self.with_context(C::clone)
    }

    /// Snapshot of the transitions executed so far.
    pub fn history(&self) -> StateHistory {
        self.inner.shared.history.lock().clone()
    }

    fn on_worker_thread(&self) -> bool {
        self.inner.worker_thread == Some(thread::current().id())
    }
}

impl<C, I> fmt::Debug for Runner<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("id", &self.id())
            .field("started", &self.is_started())
            .field("current", &self.current_state_id())
            .finish()
    }
}

fn enter_source<C, I>(shared: &Shared<C, I>) -> Result<(), RunnerError> {
    let source = shared.current_state();
    let Some(hook) = &source.on_enter else {
        return Ok(());
    };
    let mut context = shared.context.lock();
    let mut session = Session::new(shared.id, source, &mut *context, None);
    hook.run(&mut session)
        .map_err(|e| RunnerError::hook(HookPhase::Enter, source.id(), e))
}
