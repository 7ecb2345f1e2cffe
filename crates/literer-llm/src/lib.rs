//! OpenAI-compatible chat completion client

use std::time::Duration;

use async_trait::async_trait;
use literer_core::{CompletionService, ModelId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("Completion response had no message content")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Client for `/v1/chat/completions` on OpenAI or any compatible endpoint
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("literer/0.1 (literature review assistant)")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    /// Send a chat request and return the first choice's text
    pub async fn chat(&self, model: &str, messages: Vec<Message>) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(%url, model, messages = messages.len(), "Sending chat completion");

        let resp = self
            .auth(self.client.post(&url))
            .json(&ChatRequest { model, messages })
            .send()
            .await?;
        let body = check_response_status(resp).await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or(LlmError::EmptyResponse)
    }

    /// Model ids the API key has access to
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/v1/models", self.base_url);
        let resp = self.auth(self.client.get(&url)).send().await?;
        let body = check_response_status(resp).await?;
        let parsed: ModelList = serde_json::from_str(&body)?;
        Ok(parsed.data.into_iter().map(|m| m.id).collect())
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &ModelId,
    ) -> anyhow::Result<String> {
        let messages = vec![Message::system(system_prompt), Message::user(user_prompt)];
        Ok(self.chat(model.as_str(), messages).await?)
    }
}

async fn check_response_status(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| json["error"]["message"].as_str().map(String::from))
            .unwrap_or_else(|| body.trim().to_string());
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(body)
}
