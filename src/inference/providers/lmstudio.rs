//! LM Studio provider using the OpenAI-compatible `/chat/completions` endpoint.
//!
//! Requests are sent with `stream: false`; the whole answer arrives in
//! `choices[0].message.content`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::inference::provider::{api_error, http_client};
use crate::inference::types::{ChatMessage, prompt_messages};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

pub const DEFAULT_LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct CompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct CompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChatMessage,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// LM Studio API provider (local inference server)
pub struct LmStudioProvider {
    base_url: String,
    client: reqwest::Client,
}

impl LmStudioProvider {
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_LMSTUDIO_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            base_url,
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for LmStudioProvider {
    fn name(&self) -> &str {
        "lmstudio"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = CompletionsRequest {
            model: request.model,
            messages: prompt_messages(request.system_prompt, request.question),
            stream: false,
        };

        info!(
            "LM Studio chat completion request: model={}, question_len={}",
            request.model,
            request.question.len()
        );

        // No auth for local LM Studio
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("LM Studio response status: {}", response.status());

        if !response.status().is_success() {
            return Err(api_error("LM Studio", response).await);
        }

        let parsed: CompletionsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        info!("LM Studio answered: {} bytes", content.len());
        Ok(content)
    }
}
