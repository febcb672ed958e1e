//! Centralized constants for Smart Agent.
//! Wire paths, fixed texts and defaults live here.

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
    pub const ASK_PATH: &str = "/ask";
    pub const DUE_REMINDERS_PATH: &str = "/reminders/due";
    /// Environment override for the backend base URL.
    pub const BASE_URL_ENV: &str = "SMARTAGENT_API_BASE";
}

// ─── Fixed Texts ──────────────────────────────────────────────────────────────

pub mod texts {
    pub const FALLBACK_REPLY: &str = "⚠️ Could not reach backend.";
    pub const REMINDER_PREFIX: &str = "🔔 Reminder: ";
    pub const NOTIFICATION_TITLE: &str = "🔔 Reminder";
    pub const APP_TITLE: &str = "🤖 Smart Agent";
    pub const THINKING: &str = "Agent is thinking...";
    pub const INPUT_PLACEHOLDER: &str = "Type a command, e.g., 'Remind me to study at 6pm'";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const POLL_INTERVAL_SECS: u64 = 30;
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const SNAPSHOT_KEY: &str = "chat_history";
    /// `%-I:%M:%S %p` renders like a browser's `toLocaleTimeString()`.
    pub const REMINDER_TIME_FORMAT: &str = "%-I:%M:%S %p";
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "smartagent";
    pub const CONFIG_FILE: &str = "config.toml";
    pub const DATA_DIR: &str = "smartagent";
    pub const SNAPSHOT_EXTENSION: &str = "json";
}
