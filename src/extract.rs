//! Result extraction chains
//!
//! Providers return the verdict in different places (a tool invocation, a text
//! block, a candidate part). Each provider declares an ordered chain of
//! extractors; the first one that yields a conforming result wins.

use serde_json::Value;

use crate::error::JudgeError;
use crate::types::{ClassificationResult, Label};

/// One extraction attempt over the raw provider response.
pub type Extractor = fn(&Value) -> Option<ClassificationResult>;

/// Ordered sequence of extractors for one provider.
#[derive(Clone)]
pub struct ExtractionChain {
    provider: &'static str,
    steps: Vec<(&'static str, Extractor)>,
}

impl ExtractionChain {
    pub fn new(provider: &'static str) -> Self {
        Self {
            provider,
            steps: Vec::new(),
        }
    }

    /// Append an extractor after the existing ones.
    pub fn then(mut self, name: &'static str, extractor: Extractor) -> Self {
        self.steps.push((name, extractor));
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|(name, _)| *name).collect()
    }

    pub fn run(&self, raw: &Value) -> Result<ClassificationResult, JudgeError> {
        for (name, extractor) in &self.steps {
            if let Some(result) = extractor(raw) {
                tracing::debug!(provider = self.provider, step = name, "extracted result");
                return Ok(result);
            }
            tracing::debug!(provider = self.provider, step = name, "extractor found nothing");
        }
        Err(JudgeError::NoStructuredResult {
            provider: self.provider,
        })
    }
}

/// Build a result from raw `label`/`reasoning` values.
///
/// Both must be non-empty strings and the label must name one of the three verdicts.
pub fn result_from_fields(label: Option<&Value>, reasoning: Option<&Value>) -> Option<ClassificationResult> {
    let label = label?.as_str().filter(|s| !s.trim().is_empty())?;
    let reasoning = reasoning?.as_str().filter(|s| !s.trim().is_empty())?;
    let label = Label::parse(label)?;
    Some(ClassificationResult::new(label, reasoning))
}

/// Interpret an object carrying `label` and `reasoning` keys.
pub fn result_from_object(value: &Value) -> Option<ClassificationResult> {
    let obj = value.as_object()?;
    result_from_fields(obj.get("label"), obj.get("reasoning"))
}

/// Parse reply text as a JSON verdict. Accepts a bare object or one wrapped in a
/// markdown code fence.
pub fn parse_text_result(text: &str) -> Option<ClassificationResult> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return result_from_object(&value);
    }
    let unfenced = strip_code_fence(trimmed)?;
    let value = serde_json::from_str::<Value>(&unfenced).ok()?;
    result_from_object(&value)
}

fn strip_code_fence(text: &str) -> Option<String> {
    if !text.starts_with("```") {
        return None;
    }
    let mut parts = text.splitn(2, '\n');
    parts.next()?;
    let remainder = parts.next()?.trim();
    let end = remainder.rfind("```")?;
    Some(remainder[..end].trim().to_string())
}

/// First text segment, in order, that parses as a verdict.
pub fn first_text_result<'a, I>(texts: I) -> Option<ClassificationResult>
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().find_map(parse_text_result)
}
