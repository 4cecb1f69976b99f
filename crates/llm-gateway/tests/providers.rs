//! HTTP-level tests for the completion providers against a mock server.

use std::time::Duration;

use llm_gateway::{
    GeminiClient, GroqClient, LanguageModel, LlmError, ProviderConfig, GEMINI_DEFAULT_MODEL,
    GROQ_DEFAULT_MODEL,
};
use serde_json::json;
use tracing_test::traced_test;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn groq_for(server: &MockServer) -> GroqClient {
    let config = ProviderConfig::new("groq-key", GROQ_DEFAULT_MODEL, &server.uri());
    GroqClient::with_config(config).unwrap()
}

fn gemini_for(server: &MockServer) -> GeminiClient {
    let config = ProviderConfig::new("gemini-key", GEMINI_DEFAULT_MODEL, &server.uri());
    GeminiClient::with_config(config).unwrap()
}

#[tokio::test]
async fn groq_returns_first_choice_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer groq-key"))
        .and(body_partial_json(json!({"model": "llama-3.3-70b-versatile"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "## Architecture\nLayered."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = groq_for(&server).complete("review this").await.unwrap();
    assert_eq!(text, "## Architecture\nLayered.");
}

#[tokio::test]
async fn groq_non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(413).set_body_string("request too large"))
        .mount(&server)
        .await;

    let err = groq_for(&server).complete("huge").await.unwrap_err();
    match err {
        LlmError::Status { status, body, .. } => {
            assert_eq!(status, 413);
            assert!(body.contains("too large"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn groq_truncates_prompt_to_configured_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "abcd"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProviderConfig::new("groq-key", GROQ_DEFAULT_MODEL, &server.uri())
        .with_max_prompt_chars(Some(4));
    let client = GroqClient::with_config(config).unwrap();
    assert_eq!(client.complete("abcdefgh").await.unwrap(), "ok");
}

#[tokio::test]
async fn gemini_posts_to_model_endpoint_with_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "gemini-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "tour please"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Welcome"}, {"text": " aboard"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini_for(&server).complete("tour please").await.unwrap();
    assert_eq!(text, "Welcome aboard");
}

#[tokio::test]
async fn gemini_empty_candidates_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = gemini_for(&server).complete("x").await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse { .. }));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = ProviderConfig::new("groq-key", GROQ_DEFAULT_MODEL, &server.uri())
        .with_timeout(Duration::from_millis(50));
    let err = GroqClient::with_config(config)
        .unwrap()
        .complete("review this")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Http(_)), "unexpected error: {err}");
}

#[tokio::test]
#[traced_test]
async fn submission_log_counts_characters_not_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .mount(&server)
        .await;

    // three chars, six bytes
    groq_for(&server).complete("ééé").await.unwrap();

    assert!(logs_contain("prompt_chars=3"));
    assert!(!logs_contain("prompt_chars=6"));
}
