use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::AgentError;
use crate::log::MessageLog;
use crate::message::Message;
use crate::reminder::{DueReminder, ReminderKey};
use crate::storage::SnapshotStore;

/// Pairs an ask completion with the submit that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SendTicket(u64);

impl fmt::Display for SendTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An accepted submit, ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingAsk {
    pub ticket: SendTicket,
    pub text: String,
}

/// Why a submit was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendRejected {
    /// A reply is still outstanding; the input is handed back untouched.
    Busy { input: String },
}

impl fmt::Display for SendRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendRejected::Busy { .. } => f.write_str("still waiting for the previous reply"),
        }
    }
}

impl std::error::Error for SendRejected {}

/// Everything a conversation session owns. All mutation goes through the
/// transition methods below.
pub struct SessionState {
    log: MessageLog,
    pending_input: String,
    awaiting: Option<SendTicket>,
    next_ticket: u64,
    delivered: HashSet<ReminderKey>,
    dedup_reminders: bool,
}

impl SessionState {
    pub fn new(log: MessageLog) -> Self {
        Self {
            log,
            pending_input: String::new(),
            awaiting: None,
            next_ticket: 1,
            delivered: HashSet::new(),
            dedup_reminders: true,
        }
    }

    /// Restore the log from `store` and start a fresh session around it.
    pub fn restore(store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        Self::new(MessageLog::restore(store, key))
    }

    pub fn with_reminder_dedup(mut self, enabled: bool) -> Self {
        self.dedup_reminders = enabled;
        self
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Accept the pending input: echo it into the log, clear the input and
    /// mark a reply as outstanding. Whitespace-only input is a no-op, even
    /// while a reply is outstanding.
    pub fn submit(&mut self) -> Result<Option<OutgoingAsk>, SendRejected> {
        if self.pending_input.trim().is_empty() {
            return Ok(None);
        }
        if self.awaiting.is_some() {
            return Err(SendRejected::Busy {
                input: self.pending_input.clone(),
            });
        }

        let text = std::mem::take(&mut self.pending_input);
        self.log.append(Message::user(text.clone()));

        let ticket = SendTicket(self.next_ticket);
        self.next_ticket += 1;
        self.awaiting = Some(ticket);
        tracing::debug!(%ticket, "ask dispatched");

        Ok(Some(OutgoingAsk { ticket, text }))
    }

    /// Record the outcome of an ask. Failures become the fixed fallback
    /// message. A ticket that is not the outstanding one is ignored.
    /// Returns the index of the appended entry.
    pub fn complete_ask(
        &mut self,
        ticket: SendTicket,
        outcome: Result<String, AgentError>,
    ) -> Option<usize> {
        if self.awaiting != Some(ticket) {
            tracing::debug!(%ticket, "ignoring stale ask completion");
            return None;
        }

        let message = match outcome {
            Ok(reply) => Message::bot(reply),
            Err(e) => {
                tracing::warn!(%ticket, "ask failed: {e}");
                Message::fallback()
            }
        };
        let index = self.log.append(message);
        self.awaiting = None;
        Some(index)
    }

    /// Append one synthetic bot message per reminder, in order. Returns the
    /// reminders that were accepted (already-delivered ones are skipped when
    /// de-duplication is on) with the index of their log entry.
    pub fn receive_reminders(&mut self, due: Vec<DueReminder>) -> Vec<(usize, DueReminder)> {
        let mut accepted = Vec::with_capacity(due.len());
        for reminder in due {
            if self.dedup_reminders && !self.delivered.insert(reminder.key()) {
                tracing::debug!(title = %reminder.title, "skipping already delivered reminder");
                continue;
            }
            let index = self.log.append(Message::reminder(&reminder.title));
            accepted.push((index, reminder));
        }
        accepted
    }
}
