//! Transformers for Google Gemini
//!
//! Gemini has no structured tool-result channel that can be combined with
//! search grounding, so the system instruction asks for a raw JSON reply and
//! the verdict is parsed out of the top candidate's text parts.

use serde_json::Value;

use crate::error::JudgeError;
use crate::extract::{ExtractionChain, first_text_result};
use crate::prompt;
use crate::transformers::{HttpRequestPlan, HttpStrategy};
use crate::types::{ClassificationRequest, ClassificationResult};
use crate::utils::HttpHeaderBuilder;

use super::types::{
    Content, GeminiConfig, GeminiTool, GenerateContentRequest, GenerationConfig, ThinkingConfig,
};

pub const PROVIDER_NAME: &str = "Gemini";

/// Verdict from the first JSON text part of the top candidate.
pub fn extract_candidate_text(raw: &Value) -> Option<ClassificationResult> {
    let parts = raw
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    first_text_result(
        parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str)),
    )
}

/// Request/response strategy for `models/{model}:generateContent`
#[derive(Clone)]
pub struct GeminiStrategy {
    config: GeminiConfig,
    chain: ExtractionChain,
}

impl GeminiStrategy {
    pub fn new(config: GeminiConfig) -> Self {
        let chain = ExtractionChain::new(PROVIDER_NAME).then("candidate_text", extract_candidate_text);
        Self { config, chain }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model<'a>(&'a self, req: &'a ClassificationRequest) -> &'a str {
        req.model_override().unwrap_or(&self.config.model)
    }

    pub fn build_body(&self, req: &ClassificationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content::system(prompt::json_system_prompt()),
            contents: vec![Content::user(prompt::build_user_prompt(
                &req.sentence,
                req.speaker.as_deref(),
                req.context.as_deref(),
            ))],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig {
                    thinking_budget: self.config.thinking_budget,
                },
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
            tools: vec![GeminiTool::default()],
        }
    }
}

impl Default for GeminiStrategy {
    fn default() -> Self {
        Self::new(GeminiConfig::default())
    }
}

impl HttpStrategy for GeminiStrategy {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn build_request(
        &self,
        req: &ClassificationRequest,
        api_key: &str,
    ) -> Result<HttpRequestPlan, JudgeError> {
        let base = self.config.generate_url(self.model(req));
        let headers = HttpHeaderBuilder::new().with_json_content_type().build();
        let body = serde_json::to_value(self.build_body(req)).map_err(|e| {
            JudgeError::ConfigurationError(format!("Failed to serialize Gemini request: {e}"))
        })?;
        Ok(HttpRequestPlan {
            url: format!("{base}?key={}", urlencoding::encode(api_key)),
            redacted_url: format!("{base}?key=[REDACTED]"),
            headers,
            body,
        })
    }

    fn extract_result(&self, raw: &Value) -> Result<ClassificationResult, JudgeError> {
        self.chain.run(raw)
    }
}
