use crate::backend::AgentBackend;
use crate::constants::texts;
use crate::error::Result;
use crate::notify::NotificationGate;
use crate::reminder::DueReminder;

use super::state::SessionState;

/// Apply one due set: append a message per reminder and notify when allowed.
/// Returns the delivered reminders with the log index of their entry.
pub fn deliver(
    state: &mut SessionState,
    gate: &NotificationGate,
    due: Vec<DueReminder>,
) -> Vec<(usize, DueReminder)> {
    let accepted = state.receive_reminders(due);
    for (_, reminder) in &accepted {
        gate.emit(texts::NOTIFICATION_TITLE, &reminder.notification_body());
    }
    accepted
}

/// One poll tick, run inline. Errors are returned to the caller; the
/// session loop logs and drops them.
pub async fn poll_once(
    state: &mut SessionState,
    backend: &dyn AgentBackend,
    gate: &NotificationGate,
) -> Result<usize> {
    let due = backend.due_reminders().await?;
    Ok(deliver(state, gate, due).len())
}
