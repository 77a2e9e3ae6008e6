//! Local text-classification pipeline
//!
//! A plain single-label classifier run in-process: no metadata, no reasoning, no
//! web search. Only the raw sentence goes in and only the top label comes out.

#[cfg(feature = "onnx-pipeline")]
mod onnx;

#[cfg(feature = "onnx-pipeline")]
pub use onnx::{OnnxPipelineLoader, OnnxTextClassifier};

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DEFAULT_HF_MODEL_ID;
use crate::error::JudgeError;
use crate::executors::Classifier;
use crate::types::{ClassificationRequest, ClassificationResult, Label};

/// One label with its probability, as produced by a classification pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// A loaded single-label text classifier.
///
/// Implementations return scores sorted best first.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, JudgeError>;
}

/// Resolves a model identifier to a ready classifier.
pub trait PipelineLoader: Send + Sync {
    fn load(&self, model_id: &str) -> Result<Arc<dyn TextClassifier>, JudgeError>;
}

/// Map a raw model label onto the three verdicts.
///
/// Deliberately permissive: anything that is not recognizably negative or
/// positive is `uncertain`.
pub fn normalize_label(raw: &str) -> Label {
    let folded = raw.to_lowercase();
    if folded.contains("label_0") || folded == "false" || folded.contains("negative") {
        Label::False
    } else if folded.contains("label_1") || folded == "true" || folded.contains("positive") {
        Label::True
    } else {
        Label::Uncertain
    }
}

/// Pick the model: non-blank request override, then the configured id, then the built-in.
pub fn resolve_model_id<'a>(override_id: Option<&'a str>, configured: &'a str) -> &'a str {
    override_id
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or_else(|| Some(configured.trim()).filter(|m| !m.is_empty()))
        .unwrap_or(DEFAULT_HF_MODEL_ID)
}

/// Default directory holding exported models, laid out as `<dir>/<owner>/<name>/`.
pub fn default_models_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("claim-judge").join("models"))
}

/// Loader used when no inference backend is compiled in.
#[derive(Debug, Clone, Default)]
pub struct UnavailablePipelineLoader;

impl PipelineLoader for UnavailablePipelineLoader {
    fn load(&self, model_id: &str) -> Result<Arc<dyn TextClassifier>, JudgeError> {
        Err(JudgeError::local_pipeline(format!(
            "cannot load '{model_id}': local inference is not available in this build (enable the `onnx-pipeline` feature)"
        )))
    }
}

/// The loader this build supports, reading models from `models_dir`.
#[cfg(feature = "onnx-pipeline")]
pub fn default_pipeline_loader(models_dir: PathBuf) -> Arc<dyn PipelineLoader> {
    Arc::new(OnnxPipelineLoader::new(models_dir))
}

/// The loader this build supports, reading models from `models_dir`.
#[cfg(not(feature = "onnx-pipeline"))]
pub fn default_pipeline_loader(models_dir: PathBuf) -> Arc<dyn PipelineLoader> {
    tracing::debug!(
        models_dir = %models_dir.display(),
        "onnx-pipeline feature disabled; local provider unavailable"
    );
    Arc::new(UnavailablePipelineLoader)
}

/// Classifier for the local pipeline provider.
pub struct LocalPipelineClassifier {
    loader: Arc<dyn PipelineLoader>,
    model_id: String,
}

impl LocalPipelineClassifier {
    /// `model_id` is the already-resolved identifier, see [`resolve_model_id`].
    pub fn new(loader: Arc<dyn PipelineLoader>, model_id: impl Into<String>) -> Self {
        Self {
            loader,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[async_trait::async_trait]
impl Classifier for LocalPipelineClassifier {
    async fn classify(
        &self,
        req: &ClassificationRequest,
    ) -> Result<ClassificationResult, JudgeError> {
        let loader = Arc::clone(&self.loader);
        let model_id = self.model_id.clone();
        let sentence = req.sentence.clone();

        tracing::debug!(model_id = %model_id, "running local pipeline");
        let scores = tokio::task::spawn_blocking(move || -> Result<Vec<LabelScore>, JudgeError> {
            let classifier = loader.load(&model_id)?;
            classifier.classify(&sentence)
        })
        .await
        .map_err(|e| JudgeError::local_pipeline(format!("inference task failed: {e}")))??;

        let top = scores
            .first()
            .ok_or_else(|| JudgeError::local_pipeline("pipeline returned no labels"))?;
        let label = normalize_label(&top.label);
        tracing::debug!(raw_label = %top.label, score = top.score, %label, "local pipeline label");

        Ok(ClassificationResult::new(label, ""))
    }
}
