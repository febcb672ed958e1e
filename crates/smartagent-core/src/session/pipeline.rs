use crate::backend::AgentBackend;
use crate::message::Message;

use super::state::{SendRejected, SessionState};

/// Run the whole send sequence inline: echo, ask, reply or fallback.
///
/// Returns the bot entry that closed the exchange, or `None` when the input
/// was empty.
pub async fn send(
    state: &mut SessionState,
    backend: &dyn AgentBackend,
    input: &str,
) -> Result<Option<Message>, SendRejected> {
    state.set_input(input);
    let Some(outgoing) = state.submit()? else {
        return Ok(None);
    };

    let outcome = backend.ask(&outgoing.text).await;
    let index = state.complete_ask(outgoing.ticket, outcome);
    Ok(index.and_then(|i| state.log().get(i).cloned()))
}
