use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::error::SessionError;

use super::controller::{ExerciseSession, SessionEvent};
use super::session_loop::SessionCommand;

/// Deferred delivery of controller events.
///
/// Implementations must not call back into the controller synchronously.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, after: Duration, event: SessionEvent);
}

/// Real-time scheduler: sleeps on the tokio timer, then posts the event to the
/// session loop. Events posted after the loop stopped are dropped.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    sender: UnboundedSender<SessionCommand>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(sender: UnboundedSender<SessionCommand>) -> Self {
        Self { sender }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, after: Duration, event: SessionEvent) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if sender.send(SessionCommand::Scheduled(event)).is_err() {
                tracing::trace!(?event, "session loop gone; dropping scheduled event");
            }
        });
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    seq: u64,
    event: SessionEvent,
}

#[derive(Debug, Default)]
struct Queue {
    now: Duration,
    seq: u64,
    pending: Vec<Pending>,
}

/// Virtual-time scheduler for deterministic drivers and tests.
///
/// Nothing fires on its own; [`ManualScheduler::advance`] moves the virtual
/// clock and feeds due events to a session in due order.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    queue: Mutex<Queue>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Move the clock forward by `by`, dispatching every event that falls due,
    /// including events scheduled while dispatching. Returns how many ran.
    ///
    /// # Errors
    ///
    /// Propagates the first `SessionError` raised by the session.
    pub fn advance(&self, by: Duration, session: &mut ExerciseSession) -> Result<usize, SessionError> {
        let target = self.now() + by;
        let mut dispatched = 0;
        while let Some(event) = self.pop_due(target) {
            session.handle(event)?;
            dispatched += 1;
        }
        self.lock().now = target;
        Ok(dispatched)
    }

    fn pop_due(&self, until: Duration) -> Option<SessionEvent> {
        let mut queue = self.lock();
        let idx = queue
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(idx, _)| idx)?;
        let next = queue.pending.swap_remove(idx);
        queue.now = next.due;
        Some(next.event)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, after: Duration, event: SessionEvent) {
        let mut queue = self.lock();
        let due = queue.now + after;
        let seq = queue.seq;
        queue.seq += 1;
        queue.pending.push(Pending { due, seq, event });
    }
}
