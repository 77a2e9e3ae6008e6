//! Classification executors

use std::sync::Arc;

use crate::error::JudgeError;
use crate::transformers::HttpStrategy;
use crate::types::{ClassificationRequest, ClassificationResult};

/// A backend able to classify one claim.
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        req: &ClassificationRequest,
    ) -> Result<ClassificationResult, JudgeError>;
}

/// Generic HTTP-based classifier that drives an [`HttpStrategy`].
///
/// Exactly one POST per call. No retries and no client-side timeout beyond
/// whatever the supplied `reqwest::Client` was built with.
pub struct HttpClassifier {
    pub http_client: reqwest::Client,
    pub strategy: Arc<dyn HttpStrategy>,
    pub api_key: String,
}

impl HttpClassifier {
    pub fn new(
        http_client: reqwest::Client,
        strategy: Arc<dyn HttpStrategy>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            strategy,
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for HttpClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClassifier")
            .field("provider", &self.strategy.provider_name())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait::async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        req: &ClassificationRequest,
    ) -> Result<ClassificationResult, JudgeError> {
        let provider = self.strategy.provider_name();
        let plan = self.strategy.build_request(req, &self.api_key)?;
        tracing::debug!(provider, url = %plan.redacted_url, "sending classification request");

        let resp = self
            .http_client
            .post(&plan.url)
            .headers(plan.headers)
            .json(&plan.body)
            .send()
            .await
            .map_err(|e| JudgeError::http_error(provider, e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(provider, status = status.as_u16(), "provider returned error status");
            return Err(JudgeError::api_error(provider, status.as_u16(), body));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| JudgeError::http_error(provider, e.without_url().to_string()))?;
        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| JudgeError::parse_error(provider, e.to_string()))?;

        self.strategy.extract_result(&json)
    }
}
