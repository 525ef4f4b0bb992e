//! Remote chat-completion client.
//!
//! Best effort only: every failure is logged and reported as `None` so the
//! caller answers with a local reply in the same call.

use std::fmt;

use hearth_core::{ChatMessage, CompletionRequest};
use hearth_store::CompletionConfig;
use serde::Deserialize;

#[derive(Debug)]
pub enum CompletionError {
    Timeout,
    Connect(String),
    Status(u16),
    Malformed(String),
    Empty,
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Timeout => write!(f, "request timed out"),
            CompletionError::Connect(msg) => write!(f, "request failed: {msg}"),
            CompletionError::Status(code) => write!(f, "HTTP {code}"),
            CompletionError::Malformed(msg) => write!(f, "malformed response: {msg}"),
            CompletionError::Empty => write!(f, "empty completion"),
        }
    }
}

impl std::error::Error for CompletionError {}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CompletionError::Timeout
        } else if e.is_decode() {
            CompletionError::Malformed(e.to_string())
        } else {
            CompletionError::Connect(e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct CompletionClient {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl CompletionClient {
    /// `None` when no API key is configured.
    pub fn new(config: CompletionConfig) -> Option<Self> {
        if !config.enabled() {
            return None;
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_default();
        Some(Self { config, client })
    }

    /// The trimmed reply text, or `None` on any failure.
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Option<String> {
        match self.try_complete(messages).await {
            Ok(text) => {
                tracing::debug!("remote completion received ({} chars)", text.chars().count());
                Some(text)
            }
            Err(e) => {
                tracing::warn!("remote completion failed, using local reply: {e}");
                None
            }
        }
    }

    async fn try_complete(&self, messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
        let body = CompletionRequest::new(self.config.model.clone(), messages);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let resp = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CompletionError::Status(status.as_u16()));
        }

        let text = resp.text().await?;
        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| CompletionError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(CompletionError::Empty)
    }
}
