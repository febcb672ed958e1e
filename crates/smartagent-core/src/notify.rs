//! Notification capability and the gate that consults it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not decided yet.
    #[default]
    Default,
    Granted,
    Denied,
}

/// Platform notification capability, injected into the session.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Whether this environment can show notifications at all.
    fn is_supported(&self) -> bool;

    /// Ask the user for permission. May wait on user input.
    async fn request_permission(&self) -> Permission;

    /// Current permission state, read live at every emission.
    fn permission(&self) -> Permission;

    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct NotificationGate {
    notifier: Option<Arc<dyn Notifier>>,
}

impl NotificationGate {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    /// A gate for environments without the capability.
    pub fn disabled() -> Self {
        Self { notifier: None }
    }

    pub fn is_supported(&self) -> bool {
        self.notifier.as_ref().is_some_and(|n| n.is_supported())
    }

    /// Fire-and-forget permission request. Must be called inside a tokio runtime.
    pub fn request_permission(&self) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        if !notifier.is_supported() {
            return;
        }
        tokio::spawn(async move {
            let answer = notifier.request_permission().await;
            tracing::debug!(?answer, "notification permission answered");
        });
    }

    pub fn permission(&self) -> Permission {
        match &self.notifier {
            Some(n) if n.is_supported() => n.permission(),
            _ => Permission::Denied,
        }
    }

    /// Emit a notification if permission is granted right now.
    /// Returns whether one was shown.
    pub fn emit(&self, title: &str, body: &str) -> bool {
        let Some(notifier) = &self.notifier else {
            return false;
        };
        if !notifier.is_supported() || notifier.permission() != Permission::Granted {
            return false;
        }
        match notifier.notify(title, body) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Notification failed: {e}");
                false
            }
        }
    }
}
