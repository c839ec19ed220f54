//! Bounded-concurrency FIFO job queue
//!
//! At most `concurrency` tasks run at once; the rest wait in submission
//! order. Pausing stops new starts without touching running tasks, and
//! clearing drops tasks that have not started yet.

use crate::{ProcessingError, Result};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tonal_core::QueueStatus;

/// Default number of jobs allowed to run at once
pub const DEFAULT_CONCURRENCY: usize = 3;

type Task = Pin<Box<dyn Future<Output = ()> + Send>>;

struct QueueState {
    pending: VecDeque<Task>,
    active: usize,
    paused: bool,
    concurrency: usize,
}

#[derive(Clone)]
pub struct JobQueue {
    state: Arc<Mutex<QueueState>>,
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl JobQueue {
    /// A concurrency of 0 is raised to 1 so queued tasks can always start
    pub fn new(concurrency: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                pending: VecDeque::new(),
                active: 0,
                paused: false,
                concurrency: concurrency.max(1),
            })),
        }
    }

    /// Enqueue `task`; the receiver resolves with its output once it has run
    ///
    /// A task that panics resolves to [`ProcessingError::JobAborted`]. If the
    /// task is cleared before starting, the receiver resolves to a
    /// `RecvError` instead.
    pub async fn submit<F, T>(&self, task: F) -> oneshot::Receiver<Result<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let wrapped: Task = Box::pin(async move {
            // Run in its own task so a panicking job still frees its slot
            let outcome = tokio::spawn(task).await.map_err(|e| {
                tracing::error!("Queued job aborted: {}", e);
                ProcessingError::JobAborted(e.to_string())
            });
            // The submitter may have stopped waiting; the task still counts as run
            let _ = tx.send(outcome);
        });

        {
            let mut state = self.state.lock().await;
            state.pending.push_back(wrapped);
            tracing::debug!(pending = state.pending.len(), "Enqueued job");
        }

        self.pump().await;
        rx
    }

    /// Start a worker for each free slot while the queue is running
    async fn pump(&self) {
        let mut state = self.state.lock().await;
        while !state.paused && state.active < state.concurrency {
            let Some(task) = state.pending.pop_front() else {
                break;
            };
            state.active += 1;
            tokio::spawn(work(Arc::clone(&self.state), task));
        }
    }

    pub async fn status(&self) -> QueueStatus {
        let state = self.state.lock().await;
        QueueStatus {
            pending: state.pending.len(),
            active: state.active,
            paused: state.paused,
            concurrency: state.concurrency,
        }
    }

    /// Stop starting new tasks; running tasks continue
    pub async fn pause(&self) {
        let mut state = self.state.lock().await;
        if !state.paused {
            state.paused = true;
            tracing::info!(pending = state.pending.len(), "Queue paused");
        }
    }

    /// Release queued tasks in their original order
    pub async fn resume(&self) {
        {
            let mut state = self.state.lock().await;
            if state.paused {
                state.paused = false;
                tracing::info!(pending = state.pending.len(), "Queue resumed");
            }
        }
        self.pump().await;
    }

    /// Drop every task that has not started; returns how many were dropped
    pub async fn clear(&self) -> usize {
        let mut state = self.state.lock().await;
        let dropped = state.pending.len();
        state.pending.clear();
        if dropped > 0 {
            tracing::info!(dropped, "Queue cleared");
        }
        dropped
    }
}

/// Run `task`, then keep pulling queued tasks until the queue is empty or
/// paused; the slot is released only when the worker stops
async fn work(state: Arc<Mutex<QueueState>>, mut task: Task) {
    loop {
        task.await;

        let mut guard = state.lock().await;
        if !guard.paused {
            if let Some(next) = guard.pending.pop_front() {
                task = next;
                continue;
            }
        }
        guard.active = guard.active.saturating_sub(1);
        break;
    }
}
