//! ONNX Runtime backend for the local pipeline.
//!
//! A model directory `<models_dir>/<owner>/<name>/` must contain:
//! - `model.onnx`: a sequence-classification export returning `[1, num_labels]` logits
//! - `tokenizer.json`: HuggingFace tokenizer definition
//! - `config.json`: model config; `id2label`, `model_type` and the position limit are read from it

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ort::session::Session;
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};

use super::{LabelScore, PipelineLoader, TextClassifier};
use crate::error::JudgeError;

/// Token budget when `config.json` does not state one.
const DEFAULT_MAX_INPUT_LENGTH: usize = 512;

#[derive(Debug, Default, Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    max_position_embeddings: Option<usize>,
    #[serde(default)]
    pad_token_id: Option<usize>,
}

impl ModelConfig {
    fn read(path: &Path) -> Result<Self, JudgeError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JudgeError::local_pipeline(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| JudgeError::local_pipeline(format!("invalid {}: {e}", path.display())))
    }

    /// Longest token sequence the model accepts, special tokens included.
    fn max_input_length(&self) -> usize {
        let Some(positions) = self.max_position_embeddings else {
            return DEFAULT_MAX_INPUT_LENGTH;
        };
        // RoBERTa-family position ids start after the padding index.
        let offset = match self.model_type.as_deref() {
            Some("roberta" | "xlm-roberta" | "camembert") => self.pad_token_id.unwrap_or(1) + 1,
            _ => 0,
        };
        positions.saturating_sub(offset).max(1)
    }
}

/// Load `tokenizer.json`, truncating encodings to `max_length` tokens.
fn load_tokenizer(path: &Path, max_length: usize) -> Result<Tokenizer, JudgeError> {
    let mut tokenizer = Tokenizer::from_file(path)
        .map_err(|e| JudgeError::local_pipeline(format!("Tokenizer load failed: {e}")))?;
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| JudgeError::local_pipeline(format!("invalid truncation: {e}")))?;
    Ok(tokenizer)
}

/// Sequence classifier backed by an ONNX session.
///
/// `Session::run` needs `&mut self`, hence the mutex.
pub struct OnnxTextClassifier {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    id2label: BTreeMap<usize, String>,
    uses_token_type_ids: bool,
}

impl OnnxTextClassifier {
    pub fn load(model_dir: &Path) -> Result<Self, JudgeError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let config_path = model_dir.join("config.json");

        for required in [&model_path, &tokenizer_path] {
            if !required.exists() {
                return Err(JudgeError::local_pipeline(format!(
                    "model file not found: {}",
                    required.display()
                )));
            }
        }

        let config = ModelConfig::read(&config_path)?;
        let tokenizer = load_tokenizer(&tokenizer_path, config.max_input_length())?;

        let session = Session::builder()
            .map_err(|e: ort::Error| JudgeError::local_pipeline(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e: ort::Error| JudgeError::local_pipeline(e.to_string()))?
            .commit_from_file(&model_path)
            .map_err(|e: ort::Error| JudgeError::local_pipeline(format!("ONNX load failed: {e}")))?;

        let id2label = config
            .id2label
            .into_iter()
            .filter_map(|(k, v)| k.parse::<usize>().ok().map(|idx| (idx, v)))
            .collect();
        let uses_token_type_ids = matches!(config.model_type.as_deref(), Some("bert"));

        tracing::info!("ONNX classifier loaded from {}", model_dir.display());

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            id2label,
            uses_token_type_ids,
        })
    }

    fn label_for(&self, idx: usize) -> String {
        self.id2label
            .get(&idx)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{idx}"))
    }

    fn logits(&self, text: &str) -> Result<Vec<f32>, JudgeError> {
        use ort::value::TensorRef;

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| JudgeError::local_pipeline(format!("tokenization failed: {e}")))?;

        let to_i64 = |xs: &[u32]| xs.iter().map(|&x| x as i64).collect::<Vec<i64>>();
        let input_ids = to_i64(encoding.get_ids());
        let attention_mask = to_i64(encoding.get_attention_mask());
        let token_type_ids = to_i64(encoding.get_type_ids());
        let seq_len = input_ids.len();

        let shape_err = |e: ndarray::ShapeError| JudgeError::local_pipeline(e.to_string());
        let ids_array = ndarray::Array2::from_shape_vec((1, seq_len), input_ids).map_err(shape_err)?;
        let mask_array =
            ndarray::Array2::from_shape_vec((1, seq_len), attention_mask).map_err(shape_err)?;
        let type_array =
            ndarray::Array2::from_shape_vec((1, seq_len), token_type_ids).map_err(shape_err)?;

        let tensor_err = |e: ort::Error| JudgeError::local_pipeline(e.to_string());
        let ids_tensor = TensorRef::from_array_view(&ids_array).map_err(tensor_err)?;
        let mask_tensor = TensorRef::from_array_view(&mask_array).map_err(tensor_err)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| JudgeError::local_pipeline("session lock poisoned"))?;

        let outputs = if self.uses_token_type_ids {
            let type_tensor = TensorRef::from_array_view(&type_array).map_err(tensor_err)?;
            session.run(ort::inputs![ids_tensor, mask_tensor, type_tensor])
        } else {
            session.run(ort::inputs![ids_tensor, mask_tensor])
        }
        .map_err(|e| JudgeError::local_pipeline(format!("ONNX inference failed: {e}")))?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| JudgeError::local_pipeline(format!("output extraction: {e}")))?;
        if shape.len() != 2 || shape[0] != 1 {
            return Err(JudgeError::local_pipeline(format!(
                "unexpected output shape {shape:?}, expected [1, num_labels]"
            )));
        }
        Ok(data.to_vec())
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

impl TextClassifier for OnnxTextClassifier {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, JudgeError> {
        let probs = softmax(&self.logits(text)?);
        let mut scores: Vec<LabelScore> = probs
            .into_iter()
            .enumerate()
            .map(|(idx, score)| LabelScore {
                label: self.label_for(idx),
                score,
            })
            .collect();
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scores)
    }
}

/// Loads models from `<models_dir>/<model_id>`.
#[derive(Debug, Clone)]
pub struct OnnxPipelineLoader {
    models_dir: PathBuf,
}

impl OnnxPipelineLoader {
    pub fn new(models_dir: PathBuf) -> Self {
        Self { models_dir }
    }

    fn model_dir(&self, model_id: &str) -> Result<PathBuf, JudgeError> {
        let mut dir = self.models_dir.clone();
        for segment in model_id.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(JudgeError::local_pipeline(format!(
                    "invalid model id '{model_id}'"
                )));
            }
            dir.push(segment);
        }
        Ok(dir)
    }
}

impl PipelineLoader for OnnxPipelineLoader {
    fn load(&self, model_id: &str) -> Result<Arc<dyn TextClassifier>, JudgeError> {
        let dir = self.model_dir(model_id)?;
        Ok(Arc::new(OnnxTextClassifier::load(&dir)?))
    }
}
