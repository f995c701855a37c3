//! Ollama provider using the non-streaming `/api/chat` endpoint.
//!
//! Ollama serves models locally (default `http://localhost:11434`) and needs
//! no authentication.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::inference::provider::{api_error, http_client};
use crate::inference::types::{ChatMessage, prompt_messages};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

// ============================================================================
// Ollama Chat API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Local Ollama server.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            base_url,
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: request.model,
            messages: prompt_messages(request.system_prompt, request.question),
            stream: false,
        };

        info!(
            "Ollama chat request: model={}, question_len={}",
            request.model,
            request.question.len()
        );

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Ollama response status: {}", response.status());

        if !response.status().is_success() {
            return Err(api_error("Ollama", response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = parsed
            .message
            .map(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        info!("Ollama answered: {} bytes", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_strips_trailing_slash() {
        let provider =
            OllamaProvider::new(Some("http://box:11434/".to_string()), None).unwrap();
        assert_eq!(provider.base_url, "http://box:11434");
    }

    #[test]
    fn test_new_defaults_to_localhost() {
        let provider = OllamaProvider::new(None, None).unwrap();
        assert_eq!(provider.base_url, DEFAULT_OLLAMA_BASE_URL);
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_request_body_disables_streaming() {
        let body = ChatRequest {
            model: "llama3",
            messages: prompt_messages("sys", "q"),
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Question:q");
    }
}
