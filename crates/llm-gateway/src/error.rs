//! Error types for llm-gateway

use thiserror::Error;

/// Errors that can occur while talking to a completion provider
#[derive(Error, Debug)]
pub enum LlmError {
    /// API key absent or empty
    #[error("API key for {provider} is not configured")]
    MissingApiKey { provider: String },

    /// Provider answered with a non-success status
    #[error("{provider} API error ({status}): {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// Provider answered 200 but without any generated text
    #[error("{provider} returned no completion text")]
    EmptyResponse { provider: String },

    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mentions_provider_and_code() {
        let err = LlmError::Status {
            provider: "groq".to_string(),
            status: 429,
            body: "rate limited".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("groq"));
        assert!(msg.contains("429"));
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn test_missing_key_error_names_provider() {
        let err = LlmError::MissingApiKey {
            provider: "gemini".to_string(),
        };
        assert!(err.to_string().contains("gemini"));
    }
}
