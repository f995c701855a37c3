use std::fmt;

use async_trait::async_trait;

/// Errors that can occur during provider operations.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (bad URL, unusable client settings).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
    /// The response parsed but carried no answer text.
    EmptyResponse,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::EmptyResponse => write!(f, "model returned an empty response"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to answer one question.
pub struct CompletionRequest<'a> {
    pub system_prompt: &'a str,
    pub question: &'a str,
    pub model: &'a str,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends the question and waits for the full answer. No streaming.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}

/// Build the shared reqwest client, applying the optional request timeout.
pub(crate) fn http_client(
    timeout: Option<std::time::Duration>,
) -> Result<reqwest::Client, ProviderError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ProviderError::Config(e.to_string()))
}

/// Turn a non-success HTTP response into `ProviderError::Api`.
pub(crate) async fn api_error(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    log::warn!("{provider} API error: {status} - {message}");
    ProviderError::Api { status, message }
}
