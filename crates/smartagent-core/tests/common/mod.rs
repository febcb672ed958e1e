#![allow(dead_code)]

use smartagent_core::error::{AgentError, Result};
use smartagent_core::{AgentBackend, DueReminder, Notifier, Permission};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted backend. Replies and due sets are consumed in order; when a
/// script runs dry, `ask` echoes and `due_reminders` returns nothing.
#[derive(Default)]
pub struct FakeBackend {
    replies: Mutex<VecDeque<Result<String>>>,
    due: Mutex<VecDeque<Result<Vec<DueReminder>>>>,
    pub asked: Mutex<Vec<String>>,
    pub polls: AtomicUsize,
    pub ask_delay: Option<Duration>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ask_delay(mut self, delay: Duration) -> Self {
        self.ask_delay = Some(delay);
        self
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail_ask(self) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(AgentError::Other("connection refused".into())));
        self
    }

    pub fn due(self, reminders: Vec<DueReminder>) -> Self {
        self.due.lock().unwrap().push_back(Ok(reminders));
        self
    }

    pub fn fail_poll(self) -> Self {
        self.due
            .lock()
            .unwrap()
            .push_back(Err(AgentError::backend(500, "boom")));
        self
    }

    pub fn ask_count(&self) -> usize {
        self.asked.lock().unwrap().len()
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AgentBackend for FakeBackend {
    async fn ask(&self, message: &str) -> Result<String> {
        self.asked.lock().unwrap().push(message.to_string());
        if let Some(delay) = self.ask_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(format!("echo: {message}")))
    }

    async fn due_reminders(&self) -> Result<Vec<DueReminder>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.due.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Records every notification it is asked to show.
pub struct RecordingNotifier {
    pub permission: Mutex<Permission>,
    pub answer: Permission,
    pub requests: AtomicUsize,
    pub shown: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new(answer: Permission) -> Self {
        Self {
            permission: Mutex::new(Permission::Default),
            answer,
            requests: AtomicUsize::new(0),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn granted() -> Self {
        let n = Self::new(Permission::Granted);
        *n.permission.lock().unwrap() = Permission::Granted;
        n
    }

    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    fn is_supported(&self) -> bool {
        true
    }

    async fn request_permission(&self) -> Permission {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.permission.lock().unwrap() = self.answer;
        self.answer
    }

    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    fn notify(&self, title: &str, body: &str) -> Result<()> {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}
