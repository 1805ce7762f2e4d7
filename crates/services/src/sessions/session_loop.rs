use reflex_core::model::Verdict;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

use super::controller::{ExerciseSession, SessionEvent, SessionSnapshot};

/// Input to the session loop, from the learner or from the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Verdict(Verdict),
    Replay,
    Retry,
    Shutdown,
    Scheduled(SessionEvent),
}

/// Cloneable front end of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: UnboundedSender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub fn verdict(&self, verdict: Verdict) {
        self.send(SessionCommand::Verdict(verdict));
    }

    pub fn replay(&self) {
        self.send(SessionCommand::Replay);
    }

    pub fn retry(&self) {
        self.send(SessionCommand::Retry);
    }

    /// Tear the session down; the loop exits after handling this.
    pub fn shutdown(&self) {
        self.send(SessionCommand::Shutdown);
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    fn send(&self, command: SessionCommand) {
        if self.commands.send(command).is_err() {
            tracing::debug!(?command, "session loop already stopped");
        }
    }
}

/// Single consumer that owns the controller and applies commands in order.
pub struct SessionLoop {
    session: ExerciseSession,
    commands: UnboundedReceiver<SessionCommand>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionLoop {
    /// Wrap a (usually already started) session.
    ///
    /// `sender` must feed `commands`; it is the handle's side of the channel.
    #[must_use]
    pub fn new(
        session: ExerciseSession,
        sender: UnboundedSender<SessionCommand>,
        commands: UnboundedReceiver<SessionCommand>,
    ) -> (SessionHandle, Self) {
        let (snapshots, receiver) = watch::channel(session.snapshot());
        let handle = SessionHandle {
            commands: sender,
            snapshots: receiver,
        };
        (
            handle,
            Self {
                session,
                commands,
                snapshots,
            },
        )
    }

    /// Process commands until shutdown or until every sender is gone.
    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            let keep_running = self.apply(command);
            self.publish();
            if !keep_running {
                break;
            }
        }
        self.session.teardown();
        self.publish();
    }

    fn apply(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Verdict(verdict) => {
                self.session.submit(verdict);
            }
            SessionCommand::Replay => {
                self.session.replay();
            }
            SessionCommand::Retry => {
                if let Err(err) = self.session.retry() {
                    tracing::warn!(%err, "retry ignored");
                }
            }
            SessionCommand::Scheduled(event) => {
                if let Err(err) = self.session.handle(event) {
                    tracing::error!(%err, "session event failed");
                }
            }
            SessionCommand::Shutdown => return false,
        }
        true
    }

    fn publish(&self) {
        let next = self.session.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
