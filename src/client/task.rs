//! Cancellable handles for in-flight API calls.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Lifecycle of a single API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Dispatched,
    Succeeded,
    Failed,
    Cancelled,
}

impl TaskState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => TaskState::Succeeded,
            2 => TaskState::Failed,
            3 => TaskState::Cancelled,
            _ => TaskState::Dispatched,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            TaskState::Dispatched => 0,
            TaskState::Succeeded => 1,
            TaskState::Failed => 2,
            TaskState::Cancelled => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != TaskState::Dispatched
    }
}

/// State shared between a [`DataTask`] and the spawned pipeline.
///
/// Only one transition out of `Dispatched` can succeed, which is what
/// guarantees that a cancelled call never delivers and a delivered call
/// cannot be cancelled afterwards.
#[derive(Debug, Default)]
pub(crate) struct SharedState(AtomicU8);

impl SharedState {
    pub(crate) fn get(&self) -> TaskState {
        TaskState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move from `Dispatched` to `next`; false if another transition won.
    pub(crate) fn finish(&self, next: TaskState) -> bool {
        self.0
            .compare_exchange(
                TaskState::Dispatched.as_u8(),
                next.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Handle to an in-flight API call.
///
/// Awaiting the handle resolves to the call's terminal state once its
/// completion callback has returned (or immediately after cancellation).
/// Dropping the handle does not cancel the call.
#[derive(Debug)]
pub struct DataTask {
    id: u64,
    state: Arc<SharedState>,
    handle: JoinHandle<()>,
}

impl DataTask {
    pub(crate) fn new(id: u64, state: Arc<SharedState>, handle: JoinHandle<()>) -> Self {
        Self { id, state, handle }
    }

    /// Session-unique identifier, useful in logs.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> TaskState {
        self.state.get()
    }

    /// Cancel the call if it has not completed yet.
    ///
    /// Returns true when this call moved the task to `Cancelled`; the
    /// completion callback is then never invoked.
    pub fn cancel(&self) -> bool {
        let cancelled = self.state.finish(TaskState::Cancelled);
        if cancelled {
            log::debug!("Cancelled task {}", self.id);
            self.handle.abort();
        }
        cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for DataTask {
    type Output = TaskState;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(())) => Poll::Ready(self.state.get()),
            Poll::Ready(Err(err)) => {
                if !err.is_cancelled() {
                    log::error!("Task {} ended abnormally: {}", self.id, err);
                }
                // Panicked before delivering: nothing reached the callback
                self.state.finish(TaskState::Cancelled);
                Poll::Ready(self.state.get())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
