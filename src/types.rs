//! Request, result and outcome types shared by every provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JudgeError;

/// Factuality verdict for a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    True,
    Uncertain,
    False,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::True, Label::Uncertain, Label::False];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Label::True => "true",
            Label::Uncertain => "uncertain",
            Label::False => "false",
        }
    }

    /// Parse one of the three label names, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|l| l.as_str() == folded)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend used to classify a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Tool-calling chat provider with extended thinking and web search.
    Anthropic,
    /// Grounded-generation provider with search grounding.
    Gemini,
    /// Local single-label text-classification pipeline.
    #[serde(rename = "huggingface")]
    HuggingFace,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::HuggingFace,
    ];

    /// Identifier accepted on the wire and the command line.
    pub const fn id(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::HuggingFace => "huggingface",
        }
    }

    /// Name used in user-facing messages.
    pub const fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::HuggingFace => "HuggingFace",
        }
    }

    pub const fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::HuggingFace)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = JudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "huggingface" | "hf" | "local" => Ok(ProviderKind::HuggingFace),
            _ => Err(JudgeError::UnknownProvider(s.to_string())),
        }
    }
}

const EMPTY_SENTENCE: &str = "Please provide some text to analyze.";

/// A single claim to classify. Built once per invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub provider: ProviderKind,
    pub sentence: String,
    pub speaker: Option<String>,
    pub context: Option<String>,
    /// Model identifier override; each provider falls back to its own default.
    pub model: Option<String>,
}

impl ClassificationRequest {
    pub fn new(provider: ProviderKind, sentence: impl Into<String>) -> Self {
        Self {
            provider,
            sentence: sentence.into(),
            speaker: None,
            context: None,
            model: None,
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Reject requests with nothing to classify.
    pub fn validate(&self) -> Result<(), JudgeError> {
        if self.sentence.trim().is_empty() {
            return Err(JudgeError::InvalidInput(EMPTY_SENTENCE.to_string()));
        }
        Ok(())
    }

    /// Model override with blank values treated as absent.
    pub fn model_override(&self) -> Option<&str> {
        self.model.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

/// Raw invocation parameters as they arrive from the caller.
///
/// The provider is free text here; [`ClassifyParams::into_request`] resolves it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyParams {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub sentence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ClassifyParams {
    pub fn into_request(self) -> Result<ClassificationRequest, JudgeError> {
        let provider: ProviderKind = self.provider.parse()?;
        let sentence = self.sentence.trim();
        if sentence.is_empty() {
            return Err(JudgeError::InvalidInput(EMPTY_SENTENCE.to_string()));
        }
        Ok(ClassificationRequest {
            provider,
            sentence: sentence.to_string(),
            speaker: self.speaker,
            context: self.context,
            model: self.model,
        })
    }
}

/// Normalized provider verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    #[serde(default)]
    pub reasoning: String,
}

impl ClassificationResult {
    pub fn new(label: Label, reasoning: impl Into<String>) -> Self {
        Self {
            label,
            reasoning: reasoning.into(),
        }
    }
}

/// The contract handed back to the caller: success with a verdict, or an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Success {
        ok: bool,
        label: Label,
        reasoning: String,
    },
    Failure {
        ok: bool,
        error: String,
    },
}

impl Outcome {
    pub fn success(result: ClassificationResult) -> Self {
        Outcome::Success {
            ok: true,
            label: result.label,
            reasoning: result.reasoning,
        }
    }

    pub fn failure(error: &JudgeError) -> Self {
        Outcome::Failure {
            ok: false,
            error: error.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn label(&self) -> Option<Label> {
        match self {
            Outcome::Success { label, .. } => Some(*label),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error, .. } => Some(error),
        }
    }
}

impl From<Result<ClassificationResult, JudgeError>> for Outcome {
    fn from(result: Result<ClassificationResult, JudgeError>) -> Self {
        match result {
            Ok(r) => Outcome::success(r),
            Err(e) => Outcome::failure(&e),
        }
    }
}
