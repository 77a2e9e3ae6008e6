//! Transformers for Anthropic Claude
//!
//! Builds the Messages API request (extended thinking, web search, and the
//! `emit_judgment` tool) and reduces the response content blocks to a verdict.

use serde_json::Value;

use crate::error::JudgeError;
use crate::extract::{ExtractionChain, first_text_result, result_from_object};
use crate::prompt;
use crate::transformers::{HttpRequestPlan, HttpStrategy};
use crate::types::{ClassificationRequest, ClassificationResult};
use crate::utils::HttpHeaderBuilder;

use super::config::{API_VERSION, AnthropicConfig};
use super::types::{
    EMIT_JUDGMENT_TOOL, Message, MessagesRequest, ThinkingParam, ToolChoice, emit_judgment_tool,
    web_search_tool,
};

pub const PROVIDER_NAME: &str = "Anthropic";

fn content_blocks(raw: &Value) -> impl Iterator<Item = &Value> {
    raw.get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn block_type(block: &Value) -> Option<&str> {
    block.get("type").and_then(Value::as_str)
}

/// Verdict from an `emit_judgment` tool invocation.
pub fn extract_tool_use(raw: &Value) -> Option<ClassificationResult> {
    content_blocks(raw)
        .filter(|b| block_type(b) == Some("tool_use"))
        .filter(|b| b.get("name").and_then(Value::as_str) == Some(EMIT_JUDGMENT_TOOL))
        .find_map(|b| b.get("input").and_then(result_from_object))
}

/// Verdict from JSON written into a plain text block.
pub fn extract_text_json(raw: &Value) -> Option<ClassificationResult> {
    first_text_result(
        content_blocks(raw)
            .filter(|b| block_type(b) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str)),
    )
}

/// Request/response strategy for the Anthropic Messages API
#[derive(Clone)]
pub struct AnthropicStrategy {
    config: AnthropicConfig,
    chain: ExtractionChain,
}

impl AnthropicStrategy {
    pub fn new(config: AnthropicConfig) -> Self {
        let chain = ExtractionChain::new(PROVIDER_NAME)
            .then("tool_use", extract_tool_use)
            .then("text_json", extract_text_json);
        Self { config, chain }
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    pub fn build_body(&self, req: &ClassificationRequest) -> MessagesRequest {
        let model = req
            .model_override()
            .unwrap_or(&self.config.model)
            .to_string();
        MessagesRequest {
            model,
            max_tokens: self.config.max_tokens,
            system: prompt::system_prompt(),
            thinking: ThinkingParam::enabled(self.config.thinking_budget),
            tool_choice: ToolChoice::auto(),
            tools: vec![
                emit_judgment_tool(),
                web_search_tool(
                    self.config.web_search_max_uses,
                    &self.config.web_search_timezone,
                ),
            ],
            messages: vec![Message::user_text(prompt::build_user_prompt(
                &req.sentence,
                req.speaker.as_deref(),
                req.context.as_deref(),
            ))],
        }
    }
}

impl Default for AnthropicStrategy {
    fn default() -> Self {
        Self::new(AnthropicConfig::default())
    }
}

impl HttpStrategy for AnthropicStrategy {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn build_request(
        &self,
        req: &ClassificationRequest,
        api_key: &str,
    ) -> Result<HttpRequestPlan, JudgeError> {
        self.config.validate()?;
        let headers = HttpHeaderBuilder::new()
            .with_custom_auth("x-api-key", api_key)?
            .with_json_content_type()
            .with_header("anthropic-version", API_VERSION)?
            .with_header("anthropic-dangerous-direct-browser-access", "true")?
            .build();
        let body = serde_json::to_value(self.build_body(req)).map_err(|e| {
            JudgeError::ConfigurationError(format!("Failed to serialize Anthropic request: {e}"))
        })?;
        let url = self.config.messages_url();
        Ok(HttpRequestPlan {
            redacted_url: url.clone(),
            url,
            headers,
            body,
        })
    }

    fn extract_result(&self, raw: &Value) -> Result<ClassificationResult, JudgeError> {
        self.chain.run(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Label, ProviderKind};
    use serde_json::json;

    fn request() -> ClassificationRequest {
        ClassificationRequest::new(ProviderKind::Anthropic, "Water boils at 100C at sea level.")
    }

    #[test]
    fn body_carries_thinking_tools_and_prompt() {
        let plan = AnthropicStrategy::default()
            .build_request(&request(), "sk-ant-test")
            .unwrap();
        let body = &plan.body;
        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["thinking"], json!({"type": "enabled", "budget_tokens": 1024}));
        assert_eq!(body["tool_choice"], json!({"type": "auto"}));
        assert!(body["thinking"]["budget_tokens"].as_u64() < body["max_tokens"].as_u64());

        let tools = body["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "emit_judgment");
        assert_eq!(tools[0]["input_schema"]["required"], json!(["label", "reasoning"]));
        assert_eq!(tools[0]["input_schema"]["additionalProperties"], false);
        assert_eq!(tools[1]["type"], "web_search_20250305");
        assert_eq!(tools[1]["max_uses"], 3);
        assert_eq!(tools[1]["user_location"]["type"], "approximate");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        let text = messages[0]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("speaker: n/a"));
        assert!(text.contains("context: n/a"));
    }

    #[test]
    fn headers_include_version_and_browser_marker() {
        let plan = AnthropicStrategy::default()
            .build_request(&request(), "sk-ant-test")
            .unwrap();
        let get = |k: &str| plan.headers.get(k).and_then(|v| v.to_str().ok());
        assert_eq!(get("x-api-key"), Some("sk-ant-test"));
        assert_eq!(get("anthropic-version"), Some("2023-06-01"));
        assert_eq!(get("anthropic-dangerous-direct-browser-access"), Some("true"));
        assert_eq!(plan.url, "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn model_override_replaces_default() {
        let req = request().with_model("claude-3-7-sonnet-20250219");
        let body = AnthropicStrategy::default().build_body(&req);
        assert_eq!(body.model, "claude-3-7-sonnet-20250219");
    }

    #[test]
    fn tool_use_wins_over_text() {
        let raw = json!({
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "{\"label\":\"false\",\"reasoning\":\"text path\"}"},
                {"type": "tool_use", "id": "t1", "name": "emit_judgment",
                 "input": {"label": "true", "reasoning": "X"}}
            ]
        });
        let out = AnthropicStrategy::default().extract_result(&raw).unwrap();
        assert_eq!(out, ClassificationResult::new(Label::True, "X"));
    }

    #[test]
    fn falls_back_to_text_json() {
        let raw = json!({
            "content": [
                {"type": "server_tool_use", "name": "web_search", "input": {"query": "q"}},
                {"type": "web_search_tool_result", "content": []},
                {"type": "text", "text": "Let me check."},
                {"type": "text", "text": "{\"label\":\"false\",\"reasoning\":\"Y\"}"}
            ]
        });
        let out = AnthropicStrategy::default().extract_result(&raw).unwrap();
        assert_eq!(out, ClassificationResult::new(Label::False, "Y"));
    }

    #[test]
    fn incomplete_tool_input_falls_through() {
        let raw = json!({
            "content": [
                {"type": "tool_use", "name": "emit_judgment", "input": {"label": "true", "reasoning": ""}},
                {"type": "tool_use", "name": "other_tool", "input": {"label": "true", "reasoning": "nope"}}
            ]
        });
        let err = AnthropicStrategy::default().extract_result(&raw).unwrap_err();
        assert_eq!(err.to_string(), "Anthropic: No structured result found.");
    }

    #[test]
    fn missing_content_is_no_structured_result() {
        let err = AnthropicStrategy::default()
            .extract_result(&json!({"type": "message"}))
            .unwrap_err();
        assert!(matches!(err, JudgeError::NoStructuredResult { .. }));
    }
}
