//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.pyassist/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Provider;
use crate::inference::providers::{DEFAULT_LMSTUDIO_BASE_URL, DEFAULT_OLLAMA_BASE_URL};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AssistConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ollama: EndpointConfig,
    #[serde(default)]
    pub lmstudio: EndpointConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub history_file: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "llama3";
pub const DEFAULT_HISTORY_FILE: &str = "chat_history.json";

const DEFAULT_SYSTEM_PROMPT: &str = "You're a Python expert, and your task is to help users with clean, simple, and reliable Python code. \
    When explaining code, follow these rules. \
    Clarity: Make the response beginner-friendly. Break down complex concepts into simple, digestible explanations. \
    Security: Always prioritize security. For any code dealing with user data, include proper security measures such as password hashing \
    (e.g., using bcrypt or werkzeug.security), secure cookies, and input validation. \
    Completeness: Include all the necessary components for a full implementation. When applicable, explain how to set up a proper database, \
    handle user authentication, and validate input safely. Include error handling to ensure the code works as expected in different scenarios. \
    Code Quality: Follow best practices for code quality: write clean, modular code, and include relevant comments explaining what each part \
    of the code does. Ensure the code can scale to more complex applications. \
    Edge Cases: Consider potential edge cases and errors users might encounter. Make sure the code can handle incorrect inputs, missing data, \
    and other common issues. \
    Relevance: Stay on topic, and make sure your code and explanations are highly relevant to the question. If you suggest improvements or \
    advanced features, explain why they are necessary and how they enhance the solution. \
    Performance: Ensure the code is optimized for performance, particularly for common tasks in web development, such as handling form \
    submissions, working with databases, and managing sessions. \
    When you provide examples, always recommend production-ready practices and include any additional relevant considerations, \
    such as database setup or dealing with large datasets.";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: Provider,
    pub model_name: String,
    pub history_file: PathBuf,
    pub request_timeout: Option<Duration>,
    pub system_prompt: String,
    pub ollama_base_url: String,
    pub lmstudio_base_url: String,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub history_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.pyassist/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".pyassist"))
}

/// Returns the path to `~/.pyassist/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.pyassist/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AssistConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AssistConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AssistConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(AssistConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<AssistConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# pyassist configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# provider = "ollama"                  # "ollama" or "lmstudio"
# model = "llama3"
# history_file = "chat_history.json"   # Relative paths resolve against the working directory
# request_timeout_secs = 120           # Omit to wait indefinitely
# system_prompt = "You're a Python expert..."
# system_prompt_file = "system.md"     # Path relative to ~/.pyassist/

# [ollama]
# base_url = "http://localhost:11434"  # Or set OLLAMA_BASE_URL

# [lmstudio]
# base_url = "http://localhost:1234/v1" # Or set LM_STUDIO_BASE_URL
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AssistConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Provider: CLI → env → config → default
    let provider = cli
        .provider
        .or_else(|| {
            std::env::var("PYASSIST_PROVIDER")
                .ok()
                .and_then(|s| parse_provider(&s))
        })
        .or(config.general.provider)
        .unwrap_or_default();

    // Model: CLI → env → config → default
    let model_name = cli
        .model
        .clone()
        .or_else(|| std::env::var("PYASSIST_MODEL").ok())
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // History file: CLI → env → config → default
    let history_file = cli
        .history_file
        .clone()
        .or_else(|| std::env::var("PYASSIST_HISTORY_FILE").ok().map(PathBuf::from))
        .or_else(|| config.general.history_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE));

    let ollama_base_url = std::env::var("OLLAMA_BASE_URL")
        .ok()
        .or_else(|| config.ollama.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string());

    let lmstudio_base_url = std::env::var("LM_STUDIO_BASE_URL")
        .ok()
        .or_else(|| config.lmstudio.base_url.clone())
        .unwrap_or_else(|| DEFAULT_LMSTUDIO_BASE_URL.to_string());

    ResolvedConfig {
        provider,
        model_name,
        history_file,
        request_timeout: config
            .general
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
        system_prompt: resolve_system_prompt(config, config_dir().as_deref()),
        ollama_base_url,
        lmstudio_base_url,
    }
}

fn parse_provider(value: &str) -> Option<Provider> {
    match value.trim().to_ascii_lowercase().as_str() {
        "ollama" => Some(Provider::Ollama),
        "lmstudio" | "lm-studio" => Some(Provider::LmStudio),
        other => {
            warn!("Ignoring unknown provider '{}'", other);
            None
        }
    }
}

/// Resolves the system prompt: inline wins over file, both win over default.
fn resolve_system_prompt(config: &AssistConfig, base_dir: Option<&Path>) -> String {
    if let Some(ref prompt) = config.general.system_prompt {
        return prompt.clone();
    }

    if let (Some(file), Some(dir)) = (&config.general.system_prompt_file, base_dir) {
        let prompt_path = dir.join(file);
        match fs::read_to_string(&prompt_path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    info!("Loaded system prompt from {}", prompt_path.display());
                    return trimmed;
                }
                warn!("System prompt file is empty: {}", prompt_path.display());
            }
            Err(e) => {
                warn!(
                    "Failed to read system prompt file {}: {}",
                    prompt_path.display(),
                    e
                );
            }
        }
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}
