pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod log;
pub mod message;
pub mod notify;
pub mod reminder;
pub mod session;
pub mod storage;

// Re-export key types
pub use backend::{AgentBackend, HttpBackend};
pub use config::Settings;
pub use error::AgentError;
pub use log::MessageLog;
pub use message::{Message, Sender};
pub use notify::{NotificationGate, Notifier, Permission};
pub use reminder::{DueReminder, RemindAt, ReminderKey};
pub use session::{
    RunningSession, SendRejected, Session, SessionEvent, SessionHandle, SessionState,
};
pub use storage::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
