//! Remote agent operations.

mod http;

pub use http::HttpBackend;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reminder::DueReminder;

/// The two remote operations a session consumes.
#[async_trait::async_trait]
pub trait AgentBackend: Send + Sync {
    /// `POST {base}/ask`; returns the reply text.
    async fn ask(&self, message: &str) -> Result<String>;

    /// `GET {base}/reminders/due`; returns reminders in server order.
    async fn due_reminders(&self) -> Result<Vec<DueReminder>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub reply: String,
}

/// A body without `due` counts as nothing due.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DueResponse {
    #[serde(default)]
    pub due: Option<Vec<DueReminder>>,
}

impl DueResponse {
    pub fn into_reminders(self) -> Vec<DueReminder> {
        self.due.unwrap_or_default()
    }
}
