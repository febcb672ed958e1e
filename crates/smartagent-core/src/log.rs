use std::sync::Arc;

use crate::message::Message;
use crate::storage::SnapshotStore;

/// Append-only chat log, mirrored to a [`SnapshotStore`] after every change.
pub struct MessageLog {
    messages: Vec<Message>,
    store: Arc<dyn SnapshotStore>,
    key: String,
}

impl MessageLog {
    /// Read the snapshot under `key`. Missing or unparseable data yields an
    /// empty log; the (possibly empty) log is written back immediately.
    pub fn restore(store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let messages = match store.load(&key) {
            Ok(Some(raw)) => decode_snapshot(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read chat snapshot '{key}': {e}");
                Vec::new()
            }
        };
        tracing::debug!(count = messages.len(), "restored chat log");

        let log = Self {
            messages,
            store,
            key,
        };
        log.persist();
        log
    }

    /// Append `message` and persist. Returns the index of the new entry.
    pub fn append(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.persist();
        self.messages.len() - 1
    }

    /// Overwrite the snapshot with the full sequence. Failures are logged only.
    pub fn persist(&self) {
        let encoded = match serde_json::to_string(&self.messages) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Could not serialize chat log: {e}");
                return;
            }
        };
        if let Err(e) = self.store.save(&self.key, &encoded) {
            tracing::warn!("Could not persist chat log '{}': {e}", self.key);
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Parse a stored snapshot; anything that is not a JSON array of messages
/// decodes to an empty log.
pub fn decode_snapshot(raw: &str) -> Vec<Message> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<Message>>(raw) {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!("Discarding malformed chat snapshot: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySnapshotStore;

    #[test]
    fn test_decode_snapshot_fails_soft() {
        assert!(decode_snapshot("").is_empty());
        assert!(decode_snapshot("not json").is_empty());
        assert!(decode_snapshot(r#"{"sender":"user"}"#).is_empty());
        assert!(decode_snapshot(r#"[{"sender":"alien","text":"x"}]"#).is_empty());
    }

    #[test]
    fn test_restore_creates_snapshot_when_absent() {
        let store = Arc::new(MemorySnapshotStore::new());
        let log = MessageLog::restore(store.clone(), "chat_history");

        assert!(log.is_empty());
        assert_eq!(store.get("chat_history").as_deref(), Some("[]"));
    }

    #[test]
    fn test_append_returns_index_and_persists() {
        let store = Arc::new(MemorySnapshotStore::new());
        let mut log = MessageLog::restore(store.clone(), "k");

        assert_eq!(log.append(Message::user("a")), 0);
        assert_eq!(log.append(Message::bot("b")), 1);

        let saved = decode_snapshot(&store.get("k").unwrap());
        assert_eq!(saved, vec![Message::user("a"), Message::bot("b")]);
    }
}
