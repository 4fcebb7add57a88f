//! Cancellable handles for asynchronously submitted input.

use super::error::RunnerError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub(crate) type Reply = Result<(), RunnerError>;

enum Pending {
    Ready(Option<Reply>),
    Reply(oneshot::Receiver<Reply>),
    Task(JoinHandle<Reply>),
}

/// Completion handle of an input (or input stream) fed asynchronously.
///
/// Await it, or block on it with `wait`. Dropping the handle, or calling
/// `cancel`, withdraws input the worker has not dequeued yet.
#[must_use = "dropping a FeedHandle withdraws input that has not been processed yet"]
pub struct FeedHandle {
    pending: Pending,
}

impl FeedHandle {
    pub(crate) fn ready(result: Reply) -> Self {
        Self {
            pending: Pending::Ready(Some(result)),
        }
    }

    pub(crate) fn reply(receiver: oneshot::Receiver<Reply>) -> Self {
        Self {
            pending: Pending::Reply(receiver),
        }
    }

    pub(crate) fn task(task: JoinHandle<Reply>) -> Self {
        Self {
            pending: Pending::Task(task),
        }
    }

    /// Withdraw the input. Input already dequeued by the worker still runs
    /// to completion.
    pub fn cancel(self) {
        match self.pending {
            Pending::Ready(_) => {}
            Pending::Reply(mut receiver) => receiver.close(),
            Pending::Task(task) => task.abort(),
        }
    }

    /// Block the calling thread until the input has been processed.
    ///
    /// Must not be called from the runner's own hooks or observer.
    pub fn wait(self) -> Result<(), RunnerError> {
        futures::executor::block_on(self)
    }
}

impl Future for FeedHandle {
    type Output = Result<(), RunnerError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().pending {
            Pending::Ready(result) => Poll::Ready(result.take().unwrap_or(Err(RunnerError::Cancelled))),
            Pending::Reply(receiver) => Pin::new(receiver)
                .poll(cx)
                .map(|reply| reply.unwrap_or(Err(RunnerError::WorkerLost))),
            Pending::Task(task) => Pin::new(task).poll(cx).map(|joined| match joined {
                Ok(reply) => reply,
                Err(e) if e.is_cancelled() => Err(RunnerError::Cancelled),
                Err(_) => Err(RunnerError::WorkerLost),
            }),
        }
    }
}
