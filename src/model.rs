use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::providers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One entry of the turn history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Dispatch a generation request to the configured provider.
pub fn generate(client: &Client, cfg: &Config, prompt: &str, system: &str) -> Result<String> {
    match cfg.model_provider.to_ascii_lowercase().as_str() {
        "ollama" => {
            debug!(
                provider = "ollama",
                model = %cfg.model,
                prompt_len = prompt.len(),
                "dispatching generate request"
            );
            providers::ollama::generate(client, cfg, prompt, system)
        }
        other => {
            warn!(provider = %other, "unsupported model provider configured");
            Err(anyhow!(
                "Unsupported MODEL_PROVIDER='{}'. Supported providers: ollama.",
                other
            ))
        }
    }
}

/// Dispatch a model-download request to the configured provider.
pub fn pull(client: &Client, cfg: &Config) -> Result<String> {
    match cfg.model_provider.to_ascii_lowercase().as_str() {
        "ollama" => {
            debug!(provider = "ollama", model = %cfg.model, "dispatching pull request");
            providers::ollama::pull(client, cfg)
        }
        other => {
            warn!(provider = %other, "unsupported model provider configured");
            Err(anyhow!(
                "Unsupported MODEL_PROVIDER='{}'. Supported providers: ollama.",
                other
            ))
        }
    }
}
