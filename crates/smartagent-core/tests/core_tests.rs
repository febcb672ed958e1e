use smartagent_core::config::{PermissionPolicy, Settings};
use smartagent_core::*;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// ========================================================================
// Settings Tests (config/mod.rs)
// ========================================================================

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(settings.backend.base_url, "http://localhost:8000");
    assert_eq!(settings.backend.timeout_secs, 30);
    assert_eq!(settings.poller.interval_secs, 30);
    assert!(settings.poller.dedup);
    assert!(settings.notifications.enabled);
    assert_eq!(settings.notifications.permission, PermissionPolicy::Ask);
    assert_eq!(settings.storage.key, "chat_history");
    assert!(settings.storage.data_dir.is_none());
    assert_eq!(settings.poll_interval(), Duration::from_secs(30));
}

#[test]
fn test_settings_save_and_reload_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut settings = Settings::default();
    settings.backend.base_url = "http://agent.local:9000".into();
    settings.poller.interval_secs = 10;
    settings.notifications.permission = PermissionPolicy::Denied;
    settings.storage.data_dir = Some(temp_dir.path().join("data"));

    settings.save_to(&config_path).unwrap();
    let loaded = Settings::load_from(&config_path);

    assert_eq!(loaded.backend.base_url, "http://agent.local:9000");
    assert_eq!(loaded.poller.interval_secs, 10);
    assert_eq!(loaded.notifications.permission, PermissionPolicy::Denied);
    assert_eq!(loaded.data_dir(), temp_dir.path().join("data"));
}

#[test]
fn test_partial_config_fills_in_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[backend]\nbase_url = \"http://x:1\"\n").unwrap();

    let loaded = Settings::load_from(&config_path);

    assert_eq!(loaded.backend.base_url, "http://x:1");
    assert_eq!(loaded.backend.timeout_secs, 30);
    assert_eq!(loaded.poller.interval_secs, 30);
    assert_eq!(loaded.storage.key, "chat_history");
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "this is = = not toml").unwrap();

    let loaded = Settings::load_from(&config_path);
    assert_eq!(loaded.backend.base_url, "http://localhost:8000");
}

#[test]
fn test_env_overrides_base_url() {
    std::env::set_var("SMARTAGENT_API_BASE", "http://from-env:8080");

    let mut settings = Settings::default();
    settings.apply_env();
    assert_eq!(settings.backend.base_url, "http://from-env:8080");

    std::env::remove_var("SMARTAGENT_API_BASE");
}

#[test]
fn test_zero_interval_is_clamped() {
    let mut settings = Settings::default();
    settings.poller.interval_secs = 0;
    settings.backend.timeout_secs = 0;
    assert_eq!(settings.poll_interval(), Duration::from_secs(1));
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
}

// ========================================================================
// Snapshot persistence (log.rs + storage/)
// ========================================================================

#[test]
fn test_restore_after_reload_yields_identical_sequence() {
    let temp_dir = TempDir::new().unwrap();
    let original = vec![
        Message::user("Remind me to study at 6pm"),
        Message::bot("Got it."),
        Message::bot("🔔 Reminder: Study"),
        Message::user("thanks \"quoted\" ✓"),
    ];

    {
        let store = Arc::new(FileSnapshotStore::with_dir(temp_dir.path()).unwrap());
        let mut log = MessageLog::restore(store, "chat_history");
        for m in original.clone() {
            log.append(m);
        }
    }

    let store = Arc::new(FileSnapshotStore::with_dir(temp_dir.path()).unwrap());
    let restored = MessageLog::restore(store, "chat_history");
    assert_eq!(restored.messages(), original.as_slice());
}

#[test]
fn test_snapshot_file_is_plain_message_array() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSnapshotStore::with_dir(temp_dir.path()).unwrap());
    let mut log = MessageLog::restore(store.clone(), "chat_history");
    log.append(Message::user("hi"));

    let raw = std::fs::read_to_string(temp_dir.path().join("chat_history.json")).unwrap();
    assert_eq!(raw, r#"[{"sender":"user","text":"hi"}]"#);
}

#[test]
fn test_unreadable_snapshot_restores_empty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("chat_history.json"), "[{\"sender\":").unwrap();

    let store = Arc::new(FileSnapshotStore::with_dir(temp_dir.path()).unwrap());
    let log = MessageLog::restore(store, "chat_history");

    assert!(log.is_empty());
}

#[test]
fn test_failed_write_does_not_lose_in_memory_log() {
    struct ReadOnly;
    impl SnapshotStore for ReadOnly {
        fn load(&self, _key: &str) -> smartagent_core::error::Result<Option<String>> {
            Ok(None)
        }
        fn save(&self, _key: &str, _value: &str) -> smartagent_core::error::Result<()> {
            Err(AgentError::Storage("disk full".into()))
        }
    }

    let mut log = MessageLog::restore(Arc::new(ReadOnly), "chat_history");
    log.append(Message::user("still here"));

    assert_eq!(log.len(), 1);
    assert_eq!(log.last(), Some(&Message::user("still here")));
}
