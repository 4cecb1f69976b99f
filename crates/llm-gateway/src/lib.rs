//! LLM-Gateway: completion clients for Repo Tour
//!
//! This crate is the thin boundary between the repository-to-context
//! pipeline and hosted language models. A caller hands over one prompt
//! string and gets back the generated text verbatim.
//!
//! Two providers are implemented:
//! - [`GroqClient`]: OpenAI-compatible chat completions
//! - [`GeminiClient`]: Google `generateContent`

pub mod error;
pub mod gemini;
pub mod groq;

use std::time::Duration;

use async_trait::async_trait;

pub use error::LlmError;
pub use gemini::{GeminiClient, GEMINI_API_BASE_URL, GEMINI_DEFAULT_MODEL};
pub use groq::{GroqClient, GROQ_API_BASE_URL, GROQ_DEFAULT_MODEL};

/// Result type for completion operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Default per-request timeout. Completions on large prompts are slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A hosted model that turns a single prompt into generated text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name, used in logs and errors.
    fn provider(&self) -> &str;

    /// Model identifier submitted with each request.
    fn model(&self) -> &str;

    /// Submit `prompt` and return the generated text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Connection settings shared by every provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key sent with each request
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// API base URL (overridable for proxies and tests)
    pub base_url: String,
    /// Bounded wait for a single request
    pub timeout: Duration,
    /// Truncate prompts longer than this many characters
    pub max_prompt_chars: Option<usize>,
}

impl ProviderConfig {
    /// Create a config for the given key, model and base URL
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        ProviderConfig {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_prompt_chars: None,
        }
    }

    /// Override the model identifier
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the prompt truncation limit (in characters)
    pub fn with_max_prompt_chars(mut self, limit: Option<usize>) -> Self {
        self.max_prompt_chars = limit;
        self
    }
}

/// Cut `prompt` to at most `max_chars` characters, on a char boundary.
pub fn truncate_prompt(prompt: &str, max_chars: Option<usize>) -> &str {
    let Some(max) = max_chars else {
        return prompt;
    };
    match prompt.char_indices().nth(max) {
        Some((idx, _)) => &prompt[..idx],
        None => prompt,
    }
}

pub(crate) fn build_http_client(config: &ProviderConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("repotour-llm-gateway/", env!("CARGO_PKG_VERSION")))
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

pub(crate) fn require_key(config: &ProviderConfig, provider: &str) -> Result<()> {
    if config.api_key.trim().is_empty() {
        return Err(LlmError::MissingApiKey {
            provider: provider.to_string(),
        });
    }
    Ok(())
}
