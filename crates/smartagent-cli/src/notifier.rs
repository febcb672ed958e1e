//! Terminal implementations of the notification capability.

use smartagent_core::config::PermissionPolicy;
use smartagent_core::error::{AgentError, Result};
use smartagent_core::{Notifier, Permission};
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};

/// Requests the chat view has to act on.
#[derive(Debug)]
pub enum UiEvent {
    /// Ask the user whether reminders may notify. Answer through the sender.
    PermissionPrompt(oneshot::Sender<bool>),
    Toast { title: String, body: String },
}

fn initial_permission(policy: PermissionPolicy) -> Permission {
    match policy {
        PermissionPolicy::Ask => Permission::Default,
        PermissionPolicy::Granted => Permission::Granted,
        PermissionPolicy::Denied => Permission::Denied,
    }
}

/// Notifier backed by the interactive chat view: permission is asked with a
/// y/n prompt, notifications become a bell plus a status-bar toast.
pub struct TerminalNotifier {
    policy: PermissionPolicy,
    permission: Mutex<Permission>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
}

impl TerminalNotifier {
    pub fn new(policy: PermissionPolicy, ui_tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self {
            policy,
            permission: Mutex::new(initial_permission(policy)),
            ui_tx,
        }
    }

    fn set(&self, permission: Permission) {
        *self.permission.lock().unwrap_or_else(|e| e.into_inner()) = permission;
    }
}

#[async_trait::async_trait]
impl Notifier for TerminalNotifier {
    fn is_supported(&self) -> bool {
        true
    }

    async fn request_permission(&self) -> Permission {
        let current = self.permission();
        if self.policy != PermissionPolicy::Ask || current != Permission::Default {
            return current;
        }

        let (tx, rx) = oneshot::channel::<bool>();
        if self.ui_tx.send(UiEvent::PermissionPrompt(tx)).is_err() {
            return current;
        }

        // Default to deny if the view goes away without answering.
        let answer = match rx.await {
            Ok(true) => Permission::Granted,
            Ok(false) | Err(_) => Permission::Denied,
        };
        self.set(answer);
        answer
    }

    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self, title: &str, body: &str) -> Result<()> {
        self.ui_tx
            .send(UiEvent::Toast {
                title: title.to_string(),
                body: body.to_string(),
            })
            .map_err(|_| AgentError::Notification("chat view is closed".into()))
    }
}

/// Notifier for the one-shot modes: prints to stderr, never prompts.
pub struct ConsoleNotifier {
    permission: Permission,
}

impl ConsoleNotifier {
    pub fn new(policy: PermissionPolicy) -> Self {
        Self {
            permission: initial_permission(policy),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    fn is_supported(&self) -> bool {
        true
    }

    async fn request_permission(&self) -> Permission {
        self.permission
    }

    fn permission(&self) -> Permission {
        self.permission
    }

    fn notify(&self, title: &str, body: &str) -> Result<()> {
        eprintln!("{title}: {body}");
        Ok(())
    }
}
