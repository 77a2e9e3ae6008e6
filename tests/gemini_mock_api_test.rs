//! Mock API tests for the Gemini provider
//!
//! Response bodies follow the `generateContent` response format with search
//! grounding metadata attached to the candidate.

use claim_judge::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-pro:generateContent";

fn judge_for(server: &MockServer) -> ClaimJudge {
    ClaimJudge::new()
        .with_gemini_config(GeminiConfig::default().with_base_url(format!("{}/v1beta", server.uri())))
}

fn credentials() -> Credentials {
    Credentials::default().with_gemini_key("AIzaSyTestKey")
}

fn request() -> ClassificationRequest {
    ClassificationRequest::new(ProviderKind::Gemini, "Mount Everest is the tallest mountain above sea level.")
        .with_context("Geography quiz")
}

fn grounded_response(parts: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": parts},
            "finishReason": "STOP",
            "groundingMetadata": {
                "webSearchQueries": ["tallest mountain above sea level"],
                "groundingChunks": [{"web": {"uri": "https://example.org/everest", "title": "Everest"}}]
            }
        }],
        "usageMetadata": {"promptTokenCount": 410, "candidatesTokenCount": 60, "thoughtsTokenCount": 512}
    })
}

#[tokio::test]
async fn test_gemini_generate_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "AIzaSyTestKey"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "thinkingConfig": {"thinkingBudget": 1024},
                "temperature": 0.3,
                "topP": 1.0,
                "maxOutputTokens": 2048
            },
            "tools": [{"google_search": {}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(grounded_response(json!([
            {"text": "{\"label\": \"true\", \"reasoning\": \"8,849 m (https://example.org/everest).\"}"}
        ]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = judge_for(&mock_server)
        .classify(&request(), &credentials())
        .await
        .unwrap();

    assert_eq!(result.label, Label::True);
    assert!(result.reasoning.starts_with("8,849 m"));
}

#[tokio::test]
async fn test_gemini_model_override_changes_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grounded_response(json!([
            {"text": "{\"label\": \"false\", \"reasoning\": \"No.\"}"}
        ]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = judge_for(&mock_server)
        .classify(&request().with_model("gemini-2.5-flash"), &credentials())
        .await
        .unwrap();
    assert_eq!(result.label, Label::False);
}

#[tokio::test]
async fn test_gemini_prose_reply_has_no_structured_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(grounded_response(json!([
            {"text": "Mount Everest is indeed the tallest mountain above sea level."}
        ]))))
        .mount(&mock_server)
        .await;

    let err = judge_for(&mock_server)
        .classify(&request(), &credentials())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Gemini: No structured result found.");
}

#[tokio::test]
async fn test_gemini_error_response_does_not_echo_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string(
            r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#,
        ))
        .mount(&mock_server)
        .await;

    let err = judge_for(&mock_server)
        .classify(&request(), &credentials())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(429));
    assert!(err.to_string().starts_with("Gemini HTTP 429: "));
    assert!(!err.to_string().contains("AIzaSyTestKey"));
}
