//! Claim Judge Adapter
//!
//! The entry point callers use. `ClaimJudge` picks the strategy for the
//! requested provider, checks credentials before anything leaves the process,
//! and hands back either a [`ClassificationResult`] or, at the outer boundary,
//! an [`Outcome`].
//!
//! ```rust,ignore
//! use claim_judge::prelude::*;
//!
//! let judge = ClaimJudge::new();
//! let store = FileCredentialStore::open_default()?;
//! let outcome = judge
//!     .classify_with_store(
//!         ClassifyParams {
//!             provider: "anthropic".into(),
//!             sentence: "The Eiffel Tower is in Berlin.".into(),
//!             ..Default::default()
//!         },
//!         &store,
//!     )
//!     .await;
//! println!("{}", serde_json::to_string(&outcome)?);
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::Instrument;

use crate::config::{CredentialStore, Credentials};
use crate::error::JudgeError;
use crate::executors::{Classifier, HttpClassifier};
use crate::providers::huggingface::{
    LocalPipelineClassifier, PipelineLoader, default_models_dir, default_pipeline_loader,
    resolve_model_id,
};
use crate::providers::{AnthropicConfig, AnthropicStrategy, GeminiConfig, GeminiStrategy};
use crate::transformers::HttpStrategy;
use crate::types::{ClassificationRequest, ClassificationResult, ClassifyParams, Outcome, ProviderKind};

/// Multi-provider claim classifier.
///
/// Holds no per-call state. Clones share the HTTP connection pool and the
/// pipeline loader.
#[derive(Clone)]
pub struct ClaimJudge {
    http_client: reqwest::Client,
    anthropic: AnthropicConfig,
    gemini: GeminiConfig,
    pipeline_loader: Arc<dyn PipelineLoader>,
}

impl Default for ClaimJudge {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClaimJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimJudge")
            .field("anthropic", &self.anthropic)
            .field("gemini", &self.gemini)
            .finish_non_exhaustive()
    }
}

impl ClaimJudge {
    /// Default provider configs, a fresh HTTP client and the build's default pipeline loader.
    pub fn new() -> Self {
        let models_dir = default_models_dir().unwrap_or_else(|| PathBuf::from("models"));
        Self {
            http_client: reqwest::Client::new(),
            anthropic: AnthropicConfig::default(),
            gemini: GeminiConfig::default(),
            pipeline_loader: default_pipeline_loader(models_dir),
        }
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn with_anthropic_config(mut self, config: AnthropicConfig) -> Self {
        self.anthropic = config;
        self
    }

    pub fn with_gemini_config(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_pipeline_loader(mut self, loader: Arc<dyn PipelineLoader>) -> Self {
        self.pipeline_loader = loader;
        self
    }

    /// Use the build's default loader over a different model directory.
    pub fn with_models_dir(self, models_dir: impl Into<PathBuf>) -> Self {
        let loader = default_pipeline_loader(models_dir.into());
        self.with_pipeline_loader(loader)
    }

    pub fn anthropic_config(&self) -> &AnthropicConfig {
        &self.anthropic
    }

    pub fn gemini_config(&self) -> &GeminiConfig {
        &self.gemini
    }

    fn http_classifier(
        &self,
        strategy: Arc<dyn HttpStrategy>,
        provider: ProviderKind,
        credentials: &Credentials,
    ) -> Result<HttpClassifier, JudgeError> {
        let api_key = credentials
            .api_key(provider)
            .ok_or(JudgeError::MissingApiKey {
                provider: provider.display_name(),
            })?;
        Ok(HttpClassifier::new(
            self.http_client.clone(),
            strategy,
            api_key,
        ))
    }

    /// Build the classifier for `req.provider`. Fails on a missing credential
    /// before any network traffic.
    pub fn classifier_for(
        &self,
        req: &ClassificationRequest,
        credentials: &Credentials,
    ) -> Result<Box<dyn Classifier>, JudgeError> {
        let classifier: Box<dyn Classifier> = match req.provider {
            ProviderKind::Anthropic => Box::new(self.http_classifier(
                Arc::new(AnthropicStrategy::new(self.anthropic.clone())),
                req.provider,
                credentials,
            )?),
            ProviderKind::Gemini => Box::new(self.http_classifier(
                Arc::new(GeminiStrategy::new(self.gemini.clone())),
                req.provider,
                credentials,
            )?),
            ProviderKind::HuggingFace => {
                let model_id = resolve_model_id(req.model_override(), credentials.hf_model_id());
                Box::new(LocalPipelineClassifier::new(
                    Arc::clone(&self.pipeline_loader),
                    model_id,
                ))
            }
        };
        Ok(classifier)
    }

    /// Classify one claim with explicitly supplied credentials.
    pub async fn classify(
        &self,
        req: &ClassificationRequest,
        credentials: &Credentials,
    ) -> Result<ClassificationResult, JudgeError> {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "classify",
            %request_id,
            provider = %req.provider,
        );

        self.dispatch(req, credentials).instrument(span).await
    }

    async fn dispatch(
        &self,
        req: &ClassificationRequest,
        credentials: &Credentials,
    ) -> Result<ClassificationResult, JudgeError> {
        req.validate()?;
        let classifier = self.classifier_for(req, credentials)?;
        match classifier.classify(req).await {
            Ok(result) => {
                tracing::info!(label = %result.label, "classification complete");
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "classification failed");
                Err(e)
            }
        }
    }

    /// Validate raw parameters, classify, and fold every failure into an [`Outcome`].
    pub async fn classify_params(&self, params: ClassifyParams, credentials: &Credentials) -> Outcome {
        let result = match params.into_request() {
            Ok(req) => self.classify(&req, credentials).await,
            Err(e) => {
                tracing::warn!(error = %e, "rejected classification parameters");
                Err(e)
            }
        };
        Outcome::from(result)
    }

    /// Like [`ClaimJudge::classify_params`], reading credentials from `store` for this call only.
    pub async fn classify_with_store(
        &self,
        params: ClassifyParams,
        store: &dyn CredentialStore,
    ) -> Outcome {
        match store.load() {
            Ok(credentials) => self.classify_params(params, &credentials).await,
            Err(e) => {
                tracing::warn!(error = %e, "could not load credentials");
                Outcome::failure(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::huggingface::{LabelScore, TextClassifier, UnavailablePipelineLoader};
    use crate::types::Label;

    struct CapturingLoader {
        seen: std::sync::Mutex<Vec<String>>,
    }

    struct Negative;

    impl TextClassifier for Negative {
        fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, JudgeError> {
            Ok(vec![LabelScore {
                label: "NEGATIVE".into(),
                score: 0.8,
            }])
        }
    }

    impl PipelineLoader for CapturingLoader {
        fn load(&self, model_id: &str) -> Result<Arc<dyn TextClassifier>, JudgeError> {
            self.seen.lock().unwrap().push(model_id.to_string());
            Ok(Arc::new(Negative))
        }
    }

    fn judge_with(loader: Arc<CapturingLoader>) -> ClaimJudge {
        ClaimJudge::new().with_pipeline_loader(loader)
    }

    #[tokio::test]
    async fn missing_anthropic_key_fails_before_network() {
        let judge = ClaimJudge::new().with_anthropic_config(
            AnthropicConfig::default().with_base_url("http://127.0.0.1:9"),
        );
        let req = ClassificationRequest::new(ProviderKind::Anthropic, "x");
        let err = judge
            .classify(&req, &Credentials::default())
            .await
            .unwrap_err();
        assert!(matches!(err, JudgeError::MissingApiKey { provider: "Anthropic" }));
    }

    #[tokio::test]
    async fn blank_sentence_is_rejected_before_dispatch() {
        let loader = Arc::new(CapturingLoader {
            seen: Default::default(),
        });
        let judge = judge_with(Arc::clone(&loader));
        let creds = Credentials::default().with_anthropic_key("sk-ant-test");

        for provider in ProviderKind::ALL {
            let req = ClassificationRequest::new(provider, " \t ");
            let err = judge.classify(&req, &creds).await.unwrap_err();
            assert!(matches!(err, JudgeError::InvalidInput(_)));
            assert_eq!(err.to_string(), "Please provide some text to analyze.");
        }
        assert!(loader.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn local_model_override_beats_configured_id() {
        let loader = Arc::new(CapturingLoader {
            seen: Default::default(),
        });
        let judge = judge_with(Arc::clone(&loader));
        let creds = Credentials::default().with_hf_model_id("org/configured");

        let req = ClassificationRequest::new(ProviderKind::HuggingFace, "x");
        let out = judge.classify(&req, &creds).await.unwrap();
        assert_eq!(out, ClassificationResult::new(Label::False, ""));

        let req = req.with_model("org/override");
        judge.classify(&req, &creds).await.unwrap();

        assert_eq!(
            *loader.seen.lock().unwrap(),
            vec!["org/configured".to_string(), "org/override".to_string()]
        );
    }

    #[tokio::test]
    async fn params_errors_become_failure_outcomes() {
        let judge = ClaimJudge::new().with_pipeline_loader(Arc::new(UnavailablePipelineLoader));
        let outcome = judge
            .classify_params(
                ClassifyParams {
                    provider: "bard".into(),
                    sentence: "x".into(),
                    ..Default::default()
                },
                &Credentials::default(),
            )
            .await;
        assert_eq!(outcome.error(), Some("Unknown provider."));

        let outcome = judge
            .classify_params(
                ClassifyParams {
                    provider: "local".into(),
                    sentence: "x".into(),
                    ..Default::default()
                },
                &Credentials::default(),
            )
            .await;
        assert!(outcome.error().unwrap().starts_with("HuggingFace error:"));
    }
}
