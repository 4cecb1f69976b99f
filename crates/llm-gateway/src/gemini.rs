//! Google AI Studio (Gemini) API Integration
//!
//! Sends one prompt as a single `contents` entry to `generateContent` and
//! concatenates the text parts of the first candidate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LlmError;
use crate::{build_http_client, require_key, truncate_prompt, LanguageModel, ProviderConfig, Result};

pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_DEFAULT_MODEL: &str = "models/gemini-2.5-flash";

const PROVIDER: &str = "gemini";

/// Request structure for Gemini API
#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response structure from Gemini API
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini API client
pub struct GeminiClient {
    config: ProviderConfig,
    http_client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client with the default base URL and model
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(ProviderConfig::new(
            api_key,
            GEMINI_DEFAULT_MODEL,
            GEMINI_API_BASE_URL,
        ))
    }

    /// Create a client from an explicit config
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        require_key(&config, PROVIDER)?;
        let http_client = build_http_client(&config)?;
        Ok(GeminiClient {
            config,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        let model = &self.config.model;
        if model.starts_with("models/") {
            format!("{}/{}:generateContent", self.config.base_url, model)
        } else {
            format!("{}/models/{}:generateContent", self.config.base_url, model)
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let prompt = truncate_prompt(prompt, self.config.max_prompt_chars);
        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(
            model = %self.config.model,
            prompt_chars = prompt.chars().count(),
            "submitting generateContent"
        );
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
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
        parse_generate_response(&text)
    }
}

fn parse_generate_response(body: &str) -> Result<String> {
    let parsed: GeminiResponse = serde_json::from_str(body)?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::EmptyResponse {
            provider: PROVIDER.to_string(),
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_model(model: &str) -> GeminiClient {
        let config = ProviderConfig::new("key", model, "https://example.test/v1beta");
        GeminiClient::with_config(config).unwrap()
    }

    #[test]
    fn test_endpoint_with_models_prefix() {
        let client = client_with_model("models/gemini-2.5-flash");
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_endpoint_adds_models_prefix() {
        let client = client_with_model("gemini-2.5-pro");
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_parse_joins_text_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"tour"}]}}]}"#;
        assert_eq!(parse_generate_response(body).unwrap(), "Hello, tour");
    }

    #[test]
    fn test_parse_blocked_candidate_is_empty_response() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let err = parse_generate_response(body).unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse { .. }));
    }

    #[tokio::test]
    #[ignore] // Requires API key
    async fn test_gemini_generation() {
        let api_key = std::env::var("GEMINI_API_KEY")
            .expect("GEMINI_API_KEY must be set for this test");

        let client = GeminiClient::new(&api_key).unwrap();
        let response = client
            .complete("What is 2+2? Answer with just the number.")
            .await;

        assert!(response.unwrap().contains('4'));
    }
}
