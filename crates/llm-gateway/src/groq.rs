//! Groq chat-completions client
//!
//! Groq serves an OpenAI-compatible API. The whole prompt is sent as one
//! `user` message and the first choice is returned.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LlmError;
use crate::{build_http_client, require_key, truncate_prompt, LanguageModel, ProviderConfig, Result};

pub const GROQ_API_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const PROVIDER: &str = "groq";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Groq API client
pub struct GroqClient {
    config: ProviderConfig,
    http_client: reqwest::Client,
}

impl GroqClient {
    /// Create a client with the default base URL and model
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(ProviderConfig::new(
            api_key,
            GROQ_DEFAULT_MODEL,
            GROQ_API_BASE_URL,
        ))
    }

    /// Create a client from an explicit config
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        require_key(&config, PROVIDER)?;
        let http_client = build_http_client(&config)?;
        Ok(GroqClient {
            config,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let prompt = truncate_prompt(prompt, self.config.max_prompt_chars);
        let body = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            model: &self.config.model,
        };

        debug!(
            model = %self.config.model,
            prompt_chars = prompt.chars().count(),
            "submitting chat completion"
        );
        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        parse_chat_response(&text)
    }
}

fn parse_chat_response(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::EmptyResponse {
            provider: PROVIDER.to_string(),
        })
}
