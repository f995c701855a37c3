mod lmstudio;
mod ollama;

pub use lmstudio::{DEFAULT_LMSTUDIO_BASE_URL, LmStudioProvider};
pub use ollama::{DEFAULT_OLLAMA_BASE_URL, OllamaProvider};
