use serde::{Deserialize, Serialize};

use crate::error::JudgeError;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const API_VERSION: &str = "2023-06-01";

/// Smallest thinking budget the Messages API accepts.
pub const MIN_THINKING_BUDGET: u32 = 1024;

/// Anthropic-specific configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// Base URL; `/messages` is appended
    pub base_url: String,
    /// Model used when the request carries no override
    pub model: String,
    /// Total output budget; thinking tokens count against it
    pub max_tokens: u32,
    /// Extended-thinking budget, strictly below `max_tokens`
    pub thinking_budget: u32,
    /// Hard cap on web searches per request
    pub web_search_max_uses: u32,
    /// Approximate-location hint for web search
    pub web_search_timezone: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            thinking_budget: MIN_THINKING_BUDGET,
            web_search_max_uses: 3,
            web_search_timezone: "America/Vancouver".to_string(),
        }
    }
}

impl AnthropicConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set output and thinking budgets together, validating their relationship.
    pub fn with_budgets(mut self, max_tokens: u32, thinking_budget: u32) -> Result<Self, JudgeError> {
        self.max_tokens = max_tokens;
        self.thinking_budget = thinking_budget;
        self.validate()?;
        Ok(self)
    }

    pub const fn with_web_search_max_uses(mut self, max_uses: u32) -> Self {
        self.web_search_max_uses = max_uses;
        self
    }

    pub fn with_web_search_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.web_search_timezone = timezone.into();
        self
    }

    pub fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<(), JudgeError> {
        if self.thinking_budget < MIN_THINKING_BUDGET {
            return Err(JudgeError::ConfigurationError(format!(
                "Anthropic thinking budget must be at least {MIN_THINKING_BUDGET} tokens"
            )));
        }
        if self.thinking_budget >= self.max_tokens {
            return Err(JudgeError::ConfigurationError(format!(
                "Anthropic thinking budget ({}) must be smaller than max_tokens ({})",
                self.thinking_budget, self.max_tokens
            )));
        }
        Ok(())
    }
}
