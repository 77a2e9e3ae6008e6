use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Gemini-specific configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for the Gemini API
    pub base_url: String,
    /// Model used when the request carries no override
    pub model: String,
    /// Thinking budget in tokens
    pub thinking_budget: i32,
    /// Sampling temperature, kept low for stable labeling
    pub temperature: f64,
    pub top_p: f64,
    pub max_output_tokens: i32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            thinking_budget: 1024,
            temperature: 0.3,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }
}

impl GeminiConfig {
    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub const fn with_thinking_budget(mut self, budget: i32) -> Self {
        self.thinking_budget = budget;
        self
    }

    pub const fn with_max_output_tokens(mut self, max_output_tokens: i32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// `{base}/models/{model}:generateContent`, model URL-encoded.
    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(model)
        )
    }
}
