//! Task slots
//!
//! Each independent fetch owns a [`TaskSlot`]: its loading flag, its error
//! and its last value. A slot hands out a [`Ticket`] when a request starts
//! and only accepts the result carrying the newest ticket, so late results
//! from superseded or torn-down requests are dropped.

use crate::{ClientError, ClientResult};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Handle for one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum TaskState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct TaskSlot<T> {
    state: TaskState<T>,
    generation: u64,
}

impl<T> Default for TaskSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskSlot<T> {
    pub fn new() -> Self {
        Self {
            state: TaskState::Idle,
            generation: 0,
        }
    }

    /// Mark the slot loading and invalidate any earlier ticket
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = TaskState::Loading;
        Ticket(self.generation)
    }

    /// Store a result. Returns `false` (and changes nothing) for a stale ticket.
    pub fn finish(&mut self, ticket: Ticket, result: Result<T, String>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, current = self.generation, "Dropping stale result");
            return false;
        }
        self.state = match result {
            Ok(value) => TaskState::Ready(value),
            Err(message) => TaskState::Failed(message),
        };
        true
    }

    /// Store a client result, mapping errors to `fallback` unless the server
    /// sent a message. Cancelled results are dropped.
    pub fn finish_with(&mut self, ticket: Ticket, result: ClientResult<T>, fallback: &str) -> bool {
        match result {
            Err(ClientError::Cancelled) => {
                self.invalidate();
                false
            }
            Err(e) => self.finish(ticket, Err(e.user_message(fallback))),
            Ok(value) => self.finish(ticket, Ok(value)),
        }
    }

    /// Drop whatever is in flight; the slot returns to idle
    pub fn invalidate(&mut self) {
        self.generation += 1;
        if matches!(self.state, TaskState::Loading) {
            self.state = TaskState::Idle;
        }
    }

    /// Replace the value directly (after a local mutation acknowledged by the API)
    pub fn set(&mut self, value: T) {
        self.state = TaskState::Ready(value);
    }

    pub fn state(&self) -> &TaskState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, TaskState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            TaskState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            TaskState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            TaskState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Run `fut` unless `token` is cancelled first
pub async fn guarded<T, F>(token: &CancellationToken, fut: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ClientError::Cancelled),
        result = fut => result,
    }
}
