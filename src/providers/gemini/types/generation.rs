use serde::Serialize;

/// Gemini Generate Content Request
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    #[serde(rename = "systemInstruction")]
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
    pub tools: Vec<GeminiTool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn system(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part { text }],
        }
    }

    pub fn user(text: String) -> Self {
        Self {
            role: Some("user"),
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

/// Configuration options for model generation and outputs.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    #[serde(rename = "thinkingConfig")]
    pub thinking_config: ThinkingConfig,
    /// f64 keeps the decimal representation exact in JSON.
    pub temperature: f64,
    #[serde(rename = "topP")]
    pub top_p: f64,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    pub thinking_budget: i32,
}

/// Search grounding tool. Serializes as `{"google_search": {}}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GeminiTool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearch {}
