//! Anthropic Messages API request types

use serde::Serialize;
use serde_json::Value;

/// Name of the client tool the model calls with its verdict.
pub const EMIT_JUDGMENT_TOOL: &str = "emit_judgment";
pub const WEB_SEARCH_TOOL_TYPE: &str = "web_search_20250305";

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub thinking: ThinkingParam,
    pub tool_choice: ToolChoice,
    pub tools: Vec<AnthropicTool>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThinkingParam {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub budget_tokens: u32,
}

impl ThinkingParam {
    pub fn enabled(budget_tokens: u32) -> Self {
        Self {
            kind: "enabled",
            budget_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolChoice {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ToolChoice {
    pub fn auto() -> Self {
        Self { kind: "auto" }
    }
}

/// Client-defined tools and Anthropic-hosted server tools share the `tools` array.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnthropicTool {
    Client {
        name: String,
        description: String,
        input_schema: Value,
    },
    WebSearch {
        #[serde(rename = "type")]
        kind: &'static str,
        name: &'static str,
        max_uses: u32,
        user_location: UserLocation,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct UserLocation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: Vec<TextBlock>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl Message {
    pub fn user_text(text: String) -> Self {
        Self {
            role: "user",
            content: vec![TextBlock { kind: "text", text }],
        }
    }
}

/// Schema of `emit_judgment`: exactly `label` and `reasoning`, nothing else.
pub fn emit_judgment_tool() -> AnthropicTool {
    AnthropicTool::Client {
        name: EMIT_JUDGMENT_TOOL.to_string(),
        description: "Return a single classification object for the input sentence.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "label": { "type": "string", "enum": ["true", "uncertain", "false"] },
                "reasoning": { "type": "string" }
            },
            "required": ["label", "reasoning"],
            "additionalProperties": false
        }),
    }
}

pub fn web_search_tool(max_uses: u32, timezone: &str) -> AnthropicTool {
    AnthropicTool::WebSearch {
        kind: WEB_SEARCH_TOOL_TYPE,
        name: "web_search",
        max_uses,
        user_location: UserLocation {
            kind: "approximate",
            timezone: timezone.to_string(),
        },
    }
}
