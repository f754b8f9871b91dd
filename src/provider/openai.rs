//! Chat-completions client for OpenAI-compatible endpoints.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use super::ForecastProvider;
use crate::config::ProviderConfig;
use crate::prompt::ForecastRequest;
use crate::{BulletinError, Result};

/// Message in a chat completion request.
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
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Single-shot client; failures are reported, never retried.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("wxbulletin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BulletinError::provider(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

impl ForecastProvider for OpenAiProvider {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, request: &ForecastRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message::system(request.system.as_str()),
                Message::user(request.user.as_str()),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        info!("Sending forecast prompt to {}", self.endpoint);
        let start_time = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Provider request failed: {}", e);
                BulletinError::provider(format!("Request to {} failed: {e}", self.endpoint))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Provider returned {}: {}", status, detail);
            return Err(BulletinError::provider_status(
                status.as_u16(),
                format!("{status}: {detail}"),
            ));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            BulletinError::provider(format!("Invalid completion response: {e}"))
        })?;

        let duration = start_time.elapsed();
        if let Some(usage) = &completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Token usage"
            );
        }
        if duration.as_secs() > 60 {
            warn!("Slow provider response: {:.1}s", duration.as_secs_f64());
        }

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BulletinError::provider("Completion response contained no choices"))?;

        info!("Received forecast text in {:.2}s", duration.as_secs_f64());
        Ok(content.trim().to_string())
    }
}
