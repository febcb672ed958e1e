use reqwest::Client;
use std::time::Duration;

use super::{AgentBackend, AskRequest, AskResponse, DueResponse};
use crate::config::Settings;
use crate::constants::endpoints;
use crate::error::{AgentError, Result};
use crate::reminder::DueReminder;

/// reqwest-backed [`AgentBackend`].
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if settings.backend.base_url.trim().is_empty() {
            return Err(AgentError::Config("backend.base_url is empty".into()));
        }
        Self::new(&settings.backend.base_url, settings.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(AgentError::backend(status.as_u16(), body))
    }
}

#[async_trait::async_trait]
impl AgentBackend for HttpBackend {
    async fn ask(&self, message: &str) -> Result<String> {
        let url = self.url(endpoints::ASK_PATH);
        tracing::debug!(%url, "ask");

        let resp = self
            .http
            .post(&url)
            .json(&AskRequest {
                message: message.to_string(),
            })
            .send()
            .await?;
        let body = Self::check(resp).await?.text().await?;
        let parsed: AskResponse = serde_json::from_str(&body)?;
        Ok(parsed.reply)
    }

    async fn due_reminders(&self) -> Result<Vec<DueReminder>> {
        let url = self.url(endpoints::DUE_REMINDERS_PATH);
        tracing::debug!(%url, "poll due reminders");

        let resp = self.http.get(&url).send().await?;
        let body = Self::check(resp).await?.text().await?;
        let parsed: DueResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_reminders())
    }
}
