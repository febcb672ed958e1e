//! The running conversation session.
//!
//! A [`Session`] owns its [`SessionState`] inside one tokio task. User
//! submits and the reminder timer are its only event sources; remote calls
//! run as detached tasks and report back on a completion channel, so entries
//! land in the log in completion order while the loop stays responsive.

pub mod pipeline;
pub mod poller;
mod state;

pub use state::{OutgoingAsk, SendRejected, SendTicket, SessionState};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::backend::AgentBackend;
use crate::constants::defaults;
use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::notify::NotificationGate;
use crate::reminder::DueReminder;

#[derive(Debug, Clone)]
pub enum SessionCommand {
    Submit(String),
    /// Run a reminder check now, independent of the timer.
    PollNow,
}

/// What the front-end needs to know to render the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The restored log, sent once when the session starts.
    Restored(Vec<Message>),
    /// A new entry at `index`; the view should scroll to it.
    Appended { index: usize, message: Message },
    AwaitingReply(bool),
    SendRejected(SendRejected),
}

enum Completion {
    Ask {
        ticket: SendTicket,
        outcome: Result<String>,
    },
    Poll(Result<Vec<DueReminder>>),
}

/// Cheap, cloneable control surface of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    id: Uuid,
    commands: mpsc::UnboundedSender<SessionCommand>,
    cancel: CancellationToken,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn submit(&self, text: impl Into<String>) -> Result<()> {
        self.commands
            .send(SessionCommand::Submit(text.into()))
            .map_err(|_| AgentError::SessionClosed)
    }

    pub fn poll_now(&self) -> Result<()> {
        self.commands
            .send(SessionCommand::PollNow)
            .map_err(|_| AgentError::SessionClosed)
    }

    /// Stop the timer and end the session. In-flight calls are not aborted;
    /// their results are dropped.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.commands.is_closed()
    }
}

pub struct RunningSession {
    pub handle: SessionHandle,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
    /// Resolves to the final state after shutdown.
    pub task: JoinHandle<SessionState>,
}

pub struct Session {
    id: Uuid,
    state: SessionState,
    backend: Arc<dyn AgentBackend>,
    gate: NotificationGate,
    poll_interval: Duration,
}

impl Session {
    pub fn new(state: SessionState, backend: Arc<dyn AgentBackend>, gate: NotificationGate) -> Self {
        Self {
            id: Uuid::new_v4(),
            state,
            backend,
            gate,
            poll_interval: Duration::from_secs(defaults::POLL_INTERVAL_SECS),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Start the session loop on the current tokio runtime.
    pub fn spawn(self) -> RunningSession {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = SessionHandle {
            id: self.id,
            commands: command_tx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(self.run(command_rx, event_tx, cancel));

        RunningSession {
            handle,
            events: event_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        events: mpsc::UnboundedSender<SessionEvent>,
        cancel: CancellationToken,
    ) -> SessionState {
        tracing::info!(session = %self.id, messages = self.state.messages().len(), "session started");

        self.gate.request_permission();
        let _ = events.send(SessionEvent::Restored(self.state.messages().to_vec()));

        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let mut ticker = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(done) = done_rx.recv() => self.complete(done, &events),
                cmd = commands.recv() => match cmd {
                    Some(SessionCommand::Submit(text)) => self.submit(text, &done_tx, &events),
                    Some(SessionCommand::PollNow) => self.dispatch_poll(&done_tx),
                    None => break,
                },
                _ = ticker.tick() => self.dispatch_poll(&done_tx),
            }
        }

        tracing::info!(session = %self.id, "session ended");
        self.state
    }

    fn submit(
        &mut self,
        text: String,
        done_tx: &mpsc::UnboundedSender<Completion>,
        events: &mpsc::UnboundedSender<SessionEvent>,
    ) {
        self.state.set_input(text);
        match self.state.submit() {
            Ok(None) => {}
            Ok(Some(outgoing)) => {
                self.announce(self.state.messages().len() - 1, events);
                let _ = events.send(SessionEvent::AwaitingReply(true));

                let backend = self.backend.clone();
                let done_tx = done_tx.clone();
                tokio::spawn(async move {
                    let outcome = backend.ask(&outgoing.text).await;
                    let _ = done_tx.send(Completion::Ask {
                        ticket: outgoing.ticket,
                        outcome,
                    });
                });
            }
            Err(rejected) => {
                tracing::debug!("submit rejected: {rejected}");
                let _ = events.send(SessionEvent::SendRejected(rejected));
            }
        }
    }

    fn dispatch_poll(&self, done_tx: &mpsc::UnboundedSender<Completion>) {
        let backend = self.backend.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = backend.due_reminders().await;
            let _ = done_tx.send(Completion::Poll(result));
        });
    }

    fn complete(&mut self, done: Completion, events: &mpsc::UnboundedSender<SessionEvent>) {
        match done {
            Completion::Ask { ticket, outcome } => {
                if let Some(index) = self.state.complete_ask(ticket, outcome) {
                    self.announce(index, events);
                    let _ = events.send(SessionEvent::AwaitingReply(false));
                }
            }
            Completion::Poll(Ok(due)) => {
                for (index, _) in poller::deliver(&mut self.state, &self.gate, due) {
                    self.announce(index, events);
                }
            }
            Completion::Poll(Err(e)) => {
                tracing::warn!("Reminder check failed: {e}");
            }
        }
    }

    fn announce(&self, index: usize, events: &mpsc::UnboundedSender<SessionEvent>) {
        if let Some(message) = self.state.log().get(index) {
            let _ = events.send(SessionEvent::Appended {
                index,
                message: message.clone(),
            });
        }
    }
}
