//! Optional one-paragraph summaries through an OpenAI-compatible API.

use crate::config::SummaryConfig;
use crate::error::{CredenceError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Upper bound on the completion length.
const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f64 = 0.3;

/// Produces a short summary of extracted page text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, title: &str, text: &str) -> Result<String>;
}

/// [`Summarizer`] that calls `{base_url}/v1/chat/completions`.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiSummarizer {
    /// Create a summarizer for an OpenAI-compatible endpoint.
    ///
    /// - `base_url`: server root without `/v1` (e.g. `https://api.openai.com`).
    ///
    /// # Errors
    ///
    /// Returns [`CredenceError::Summary`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CredenceError::Summary(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Build from config. Returns `None` when summaries are disabled or no
    /// API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &SummaryConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        let Some(api_key) = config.resolved_api_key() else {
            tracing::info!("no summarisation API key configured; summaries disabled");
            return Ok(None);
        };
        Self::new(
            config.base_url.clone(),
            api_key,
            config.model.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
        .map(Some)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, title: &str, text: &str) -> serde_json::Value {
        let prompt = format!(
            "Please provide a concise, academic summary of the following content. \
             Focus on the main arguments, key findings, and relevance to academic research.\n\n\
             Title: {title}\nContent: {text}"
        );
        serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, title: &str, text: &str) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(title, text))
            .send()
            .await
            .map_err(|e| CredenceError::Summary(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CredenceError::Summary(format!("API returned {status}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CredenceError::Summary(format!("invalid response body: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| CredenceError::Summary("response contained no summary".into()))
    }
}
