use serde::{Deserialize, Serialize};

use crate::constants::texts;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One chat-log entry. Identity is its position in the log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    /// The placeholder appended when the ask call fails.
    pub fn fallback() -> Self {
        Self::bot(texts::FALLBACK_REPLY)
    }

    /// Synthetic bot entry for a due reminder.
    pub fn reminder(title: &str) -> Self {
        Self::bot(format!("{}{}", texts::REMINDER_PREFIX, title))
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
