//! Provider strategy layer
//!
//! A strategy turns a [`ClassificationRequest`] into a provider-specific HTTP
//! request and reduces the provider's JSON response to a [`ClassificationResult`].
//! The HTTP round trip itself lives in [`crate::executors`].

use reqwest::header::HeaderMap;

use crate::error::JudgeError;
use crate::types::{ClassificationRequest, ClassificationResult};

/// Everything the executor needs to issue one POST.
pub struct HttpRequestPlan {
    pub url: String,
    /// URL safe to log. Differs from `url` when the credential travels as a query parameter.
    pub redacted_url: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl std::fmt::Debug for HttpRequestPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequestPlan")
            .field("url", &self.redacted_url)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}

/// Build/extract capability pair implemented once per HTTP provider.
pub trait HttpStrategy: Send + Sync {
    /// Display name used in error messages (e.g. "Anthropic").
    fn provider_name(&self) -> &'static str;

    /// Transform a request into the provider's wire format.
    fn build_request(
        &self,
        req: &ClassificationRequest,
        api_key: &str,
    ) -> Result<HttpRequestPlan, JudgeError>;

    /// Reduce a provider response to a normalized verdict.
    fn extract_result(&self, raw: &serde_json::Value) -> Result<ClassificationResult, JudgeError>;
}
