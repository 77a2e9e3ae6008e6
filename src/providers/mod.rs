//! Provider Module
//!
//! Contains the strategy for each backend.

pub mod anthropic;
pub mod gemini;
pub mod huggingface;

pub use anthropic::{AnthropicConfig, AnthropicStrategy};
pub use gemini::{GeminiConfig, GeminiStrategy};
pub use huggingface::{LocalPipelineClassifier, PipelineLoader, TextClassifier};

use serde::Serialize;

use crate::config::DEFAULT_HF_MODEL_ID;
use crate::types::ProviderKind;

/// Provider Information
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub provider: ProviderKind,
    pub name: &'static str,
    pub description: &'static str,
    /// Accepted spellings besides the canonical id
    pub aliases: Vec<&'static str>,
    /// Settings key holding the credential, if one is required
    pub credential_key: Option<&'static str>,
    pub default_model: &'static str,
    /// Empty for the in-process pipeline
    pub default_base_url: &'static str,
}

/// Get information for all supported providers
pub fn get_supported_providers() -> Vec<ProviderInfo> {
    ProviderKind::ALL
        .into_iter()
        .map(|provider| match provider {
            ProviderKind::Anthropic => ProviderInfo {
                provider,
                name: "Anthropic",
                description: "Claude with extended thinking, web search and a structured judgment tool",
                aliases: vec!["claude"],
                credential_key: Some("ANTHROPIC_API_KEY"),
                default_model: anthropic::config::DEFAULT_MODEL,
                default_base_url: anthropic::config::DEFAULT_BASE_URL,
            },
            ProviderKind::Gemini => ProviderInfo {
                provider,
                name: "Google Gemini",
                description: "Gemini generateContent with Google Search grounding",
                aliases: vec!["google"],
                credential_key: Some("GEMINI_API_KEY"),
                default_model: gemini::types::DEFAULT_MODEL,
                default_base_url: gemini::types::DEFAULT_BASE_URL,
            },
            ProviderKind::HuggingFace => ProviderInfo {
                provider,
                name: "HuggingFace (local)",
                description: "In-process single-label text classifier, no reasoning",
                aliases: vec!["hf", "local"],
                credential_key: None,
                default_model: DEFAULT_HF_MODEL_ID,
                default_base_url: "",
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_provider_is_listed_and_aliases_parse() {
        let providers = get_supported_providers();
        assert_eq!(providers.len(), ProviderKind::ALL.len());
        for info in &providers {
            assert_eq!(info.credential_key.is_some(), info.provider.requires_api_key());
            for alias in &info.aliases {
                assert_eq!(alias.parse::<ProviderKind>().unwrap(), info.provider);
            }
        }
    }
}
