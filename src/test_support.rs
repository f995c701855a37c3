//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::history::HistoryEntry;
use crate::core::state::App;
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

/// A provider that answers every question with a canned reply and records
/// the questions it was asked.
pub struct ScriptedProvider {
    reply: Result<String, String>,
    pub questions: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            questions: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.questions
            .lock()
            .unwrap()
            .push(request.question.to_string());
        self.reply.clone().map_err(ProviderError::Network)
    }
}

/// A history entry with a derived response and a fixed timestamp.
pub fn entry(question: &str) -> HistoryEntry {
    HistoryEntry {
        question: question.to_string(),
        response: format!("answer to {question}"),
        timestamp: "2024-05-01 10:00:00".to_string(),
    }
}

/// Creates a test App with a ScriptedProvider and the given history.
pub fn test_app(history: Vec<HistoryEntry>) -> App {
    test_app_with(Arc::new(ScriptedProvider::answering("ok")), history)
}

pub fn test_app_with(provider: Arc<dyn CompletionProvider>, history: Vec<HistoryEntry>) -> App {
    App::new(
        provider,
        "test-model".to_string(),
        "system".to_string(),
        history,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_provider_records_questions() {
        let provider = ScriptedProvider::answering("fine");
        let answer = tokio_test::block_on(provider.complete(CompletionRequest {
            system_prompt: "sys",
            question: "how?",
            model: "m",
        }));
        assert_eq!(answer.unwrap(), "fine");
        assert_eq!(*provider.questions.lock().unwrap(), vec!["how?".to_string()]);
    }

    #[test]
    fn test_failing_provider_returns_network_error() {
        let provider = ScriptedProvider::failing("down");
        let answer = tokio_test::block_on(provider.complete(CompletionRequest {
            system_prompt: "sys",
            question: "how?",
            model: "m",
        }));
        assert!(matches!(answer, Err(ProviderError::Network(msg)) if msg == "down"));
    }
}
