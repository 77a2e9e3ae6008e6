//! Adapter boundary tests: parameter validation, credential handling and
//! the outcome contract handed back to callers.

use std::sync::Arc;

use claim_judge::config::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use claim_judge::prelude::*;
use claim_judge::providers::huggingface::LabelScore;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticClassifier(&'static str);

impl TextClassifier for StaticClassifier {
    fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, JudgeError> {
        Ok(vec![
            LabelScore {
                label: self.0.to_string(),
                score: 0.91,
            },
            LabelScore {
                label: "LABEL_2".to_string(),
                score: 0.09,
            },
        ])
    }
}

struct StaticLoader(&'static str);

impl PipelineLoader for StaticLoader {
    fn load(&self, _model_id: &str) -> Result<Arc<dyn TextClassifier>, JudgeError> {
        Ok(Arc::new(StaticClassifier(self.0)))
    }
}

fn params(provider: &str, sentence: &str) -> ClassifyParams {
    ClassifyParams {
        provider: provider.to_string(),
        sentence: sentence.to_string(),
        ..Default::default()
    }
}

async fn unreachable_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn missing_keys_fail_without_network_calls() {
    let server = unreachable_server().await;
    let judge = ClaimJudge::new()
        .with_anthropic_config(AnthropicConfig::default().with_base_url(server.uri()))
        .with_gemini_config(GeminiConfig::default().with_base_url(server.uri()));
    let store = MemoryCredentialStore::default();

    let outcome = judge
        .classify_with_store(params("anthropic", "Claim."), &store)
        .await;
    assert_eq!(
        outcome.error(),
        Some("Missing Anthropic API key. Set it with `claim-judge config set`.")
    );

    let outcome = judge
        .classify_with_store(params("gemini", "Claim."), &store)
        .await;
    assert!(outcome.error().unwrap().starts_with("Missing Gemini API key"));
}

#[tokio::test]
async fn unknown_provider_and_blank_sentence_are_rejected() {
    let judge = ClaimJudge::new();
    let store = MemoryCredentialStore::default();

    let outcome = judge.classify_with_store(params("openai", "Claim."), &store).await;
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"ok": false, "error": "Unknown provider."})
    );

    let outcome = judge.classify_with_store(params("gemini", "  \n "), &store).await;
    assert_eq!(outcome.error(), Some("Please provide some text to analyze."));
}

#[tokio::test]
async fn local_pipeline_outcome_has_empty_reasoning() {
    let judge = ClaimJudge::new().with_pipeline_loader(Arc::new(StaticLoader("LABEL_1")));
    let store = MemoryCredentialStore::default();

    let outcome = judge.classify_with_store(params("hf", "Claim."), &store).await;
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"ok": true, "label": "true", "reasoning": ""})
    );
}

#[tokio::test]
async fn credentials_are_read_fresh_for_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "type": "tool_use",
                "name": "emit_judgment",
                "input": {"label": "true", "reasoning": "Confirmed by https://example.org."}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("settings.json"));
    let judge = ClaimJudge::new()
        .with_anthropic_config(AnthropicConfig::default().with_base_url(server.uri()));

    let before = judge.classify_with_store(params("claude", "Claim."), &store).await;
    assert!(before.error().unwrap().starts_with("Missing Anthropic API key"));

    store
        .save(&Credentials::default().with_anthropic_key("sk-ant-later"))
        .unwrap();

    let after = judge.classify_with_store(params("claude", "Claim."), &store).await;
    assert!(after.is_ok());
    assert_eq!(after.label(), Some(Label::True));
}

#[tokio::test]
async fn unreadable_settings_become_failure_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let outcome = ClaimJudge::new()
        .classify_with_store(params("anthropic", "Claim."), &FileCredentialStore::new(&path))
        .await;
    assert!(outcome.error().unwrap().starts_with("Configuration error: invalid settings file"));
}

#[tokio::test]
async fn concurrent_calls_share_one_judge() {
    let judge = ClaimJudge::new().with_pipeline_loader(Arc::new(StaticLoader("NEGATIVE")));
    let creds = Credentials::default();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let judge = judge.clone();
            let creds = creds.clone();
            tokio::spawn(async move {
                let req = ClassificationRequest::new(ProviderKind::HuggingFace, format!("Claim {i}."));
                judge.classify(&req, &creds).await
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.label, Label::False);
    }
}
