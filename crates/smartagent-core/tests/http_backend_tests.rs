//! HTTP contract tests for the agent backend: exact request shapes for
//! `/ask` and `/reminders/due`, and how failures map onto errors.

use serde_json::json;
use smartagent_core::error::AgentError;
use smartagent_core::session::pipeline;
use smartagent_core::*;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), Duration::from_secs(5)).unwrap()
}

// ────────────────────────────────────────────────────────────────────────────
// POST /ask
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ask_posts_message_and_reads_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(json!({"message": "Remind me to study at 6pm"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Reminder set."})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend_for(&server)
        .ask("Remind me to study at 6pm")
        .await
        .unwrap();
    assert_eq!(reply, "Reminder set.");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
    assert_eq!(backend.ask("x").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_ask_non_2xx_is_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = backend_for(&server).ask("hi").await.unwrap_err();
    match err {
        AgentError::Backend { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ask_without_reply_field_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "?"})))
        .mount(&server)
        .await;

    let err = backend_for(&server).ask("hi").await.unwrap_err();
    assert!(matches!(err, AgentError::Json(_)));
}

#[tokio::test]
async fn test_ask_timeout_becomes_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"reply": "too late"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri(), Duration::from_millis(50)).unwrap();
    let mut state = SessionState::restore(Arc::new(MemorySnapshotStore::new()), "chat_history");

    let reply = pipeline::send(&mut state, &backend, "Remind me to study at 6pm")
        .await
        .unwrap();

    assert_eq!(reply, Some(Message::bot("⚠️ Could not reach backend.")));
    assert_eq!(
        state.messages(),
        &[
            Message::user("Remind me to study at 6pm"),
            Message::bot("⚠️ Could not reach backend."),
        ]
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_http_error() {
    // Nothing listens on port 9 on a test host.
    let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = backend.ask("hi").await.unwrap_err();
    assert!(matches!(err, AgentError::Http(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// GET /reminders/due
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_due_reminders_preserves_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reminders/due"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "due": [
                {"title": "Study", "remind_at": "2024-01-01T18:00:00Z"},
                {"title": "Stretch", "remind_at": 1704132000000i64}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let due = backend_for(&server).due_reminders().await.unwrap();
    assert_eq!(
        due,
        vec![
            DueReminder::new("Study", RemindAt::text("2024-01-01T18:00:00Z")),
            DueReminder::new("Stretch", RemindAt::Epoch(1_704_132_000_000.0)),
        ]
    );
}

#[tokio::test]
async fn test_due_reminders_missing_field_means_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reminders/due"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(backend_for(&server).due_reminders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_due_reminders_malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reminders/due"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    assert!(backend_for(&server).due_reminders().await.is_err());
}

#[test]
fn test_from_settings_rejects_empty_base_url() {
    let mut settings = Settings::default();
    settings.backend.base_url = "  ".into();
    assert!(matches!(
        HttpBackend::from_settings(&settings),
        Err(AgentError::Config(_))
    ));
}
