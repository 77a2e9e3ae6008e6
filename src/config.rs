//! Persisted provider credentials
//!
//! Settings live in a flat key-value JSON document:
//!
//! ```json
//! {
//!   "ANTHROPIC_API_KEY": "sk-ant-...",
//!   "GEMINI_API_KEY": null,
//!   "HUGGINGFACE_API_KEY": null,
//!   "HF_MODEL_ID": "maskitplugin/finetuned_roberta"
//! }
//! ```
//!
//! The adapter reads them through a [`CredentialStore`] at the start of every
//! call and never keeps them between calls. Saving overwrites the whole document.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::JudgeError;
use crate::types::ProviderKind;

/// Model identifier used by the local pipeline when nothing else is configured.
pub const DEFAULT_HF_MODEL_ID: &str = "maskitplugin/finetuned_roberta";

const SETTINGS_DIR: &str = "claim-judge";
const SETTINGS_FILE: &str = "settings.json";

/// On-disk shape of the settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(rename = "ANTHROPIC_API_KEY", default)]
    pub anthropic_api_key: Option<String>,
    #[serde(rename = "GEMINI_API_KEY", default)]
    pub gemini_api_key: Option<String>,
    #[serde(rename = "HUGGINGFACE_API_KEY", default)]
    pub huggingface_api_key: Option<String>,
    #[serde(rename = "HF_MODEL_ID", default = "default_model_id")]
    pub hf_model_id: String,
}

fn default_model_id() -> String {
    DEFAULT_HF_MODEL_ID.to_string()
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            gemini_api_key: None,
            huggingface_api_key: None,
            hf_model_id: default_model_id(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Provider secrets plus the local-pipeline model identifier.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub anthropic_api_key: Option<SecretString>,
    pub gemini_api_key: Option<SecretString>,
    pub huggingface_api_key: Option<SecretString>,
    pub hf_model_id: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            gemini_api_key: None,
            huggingface_api_key: None,
            hf_model_id: default_model_id(),
        }
    }
}

impl Credentials {
    pub fn with_anthropic_key(mut self, key: impl Into<String>) -> Self {
        self.anthropic_api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_gemini_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_huggingface_key(mut self, key: impl Into<String>) -> Self {
        self.huggingface_api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_hf_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.hf_model_id = model_id.into();
        self
    }

    /// API key for a credentialed provider, ignoring blank values.
    pub fn api_key(&self, provider: ProviderKind) -> Option<&str> {
        let secret = match provider {
            ProviderKind::Anthropic => self.anthropic_api_key.as_ref(),
            ProviderKind::Gemini => self.gemini_api_key.as_ref(),
            ProviderKind::HuggingFace => self.huggingface_api_key.as_ref(),
        }?;
        Some(secret.expose_secret()).filter(|k| !k.trim().is_empty())
    }

    /// Configured local model id, or the built-in default when blank.
    pub fn hf_model_id(&self) -> &str {
        let trimmed = self.hf_model_id.trim();
        if trimmed.is_empty() {
            DEFAULT_HF_MODEL_ID
        } else {
            trimmed
        }
    }

    /// Normalize into the stored shape: trimmed values, blanks as null.
    pub fn to_stored(&self) -> StoredSettings {
        let expose = |s: &Option<SecretString>| non_blank(s.as_ref().map(|k| k.expose_secret()));
        StoredSettings {
            anthropic_api_key: expose(&self.anthropic_api_key),
            gemini_api_key: expose(&self.gemini_api_key),
            huggingface_api_key: expose(&self.huggingface_api_key),
            hf_model_id: self.hf_model_id().to_string(),
        }
    }

    /// Advisory format checks for every field, as `(key, check)` pairs.
    pub fn check_all(&self) -> Vec<(&'static str, KeyCheck)> {
        let expose = |s: &Option<SecretString>| s.as_ref().map(|k| k.expose_secret().to_string());
        vec![
            (
                "ANTHROPIC_API_KEY",
                check_anthropic_key(expose(&self.anthropic_api_key).as_deref().unwrap_or("")),
            ),
            (
                "GEMINI_API_KEY",
                check_gemini_key(expose(&self.gemini_api_key).as_deref().unwrap_or("")),
            ),
            (
                "HUGGINGFACE_API_KEY",
                check_huggingface_token(
                    expose(&self.huggingface_api_key).as_deref().unwrap_or(""),
                ),
            ),
            ("HF_MODEL_ID", check_hf_model_id(&self.hf_model_id)),
        ]
    }
}

impl From<StoredSettings> for Credentials {
    fn from(stored: StoredSettings) -> Self {
        let secret = |v: Option<String>| non_blank(v.as_deref()).map(SecretString::from);
        Self {
            anthropic_api_key: secret(stored.anthropic_api_key),
            gemini_api_key: secret(stored.gemini_api_key),
            huggingface_api_key: secret(stored.huggingface_api_key),
            hf_model_id: non_blank(Some(&stored.hf_model_id)).unwrap_or_else(default_model_id),
        }
    }
}

/// Source of credentials, consulted once per classification.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Credentials, JudgeError>;

    /// Replace the stored settings wholesale.
    fn save(&self, credentials: &Credentials) -> Result<(), JudgeError>;

    /// Reset every key to null and the model id to its default.
    fn clear(&self) -> Result<(), JudgeError> {
        self.save(&Credentials::default())
    }
}

/// Settings persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/claim-judge/settings.json` for the current user.
    pub fn default_path() -> Result<PathBuf, JudgeError> {
        dirs::config_dir()
            .map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
            .ok_or_else(|| {
                JudgeError::ConfigurationError(
                    "could not determine the user configuration directory".to_string(),
                )
            })
    }

    pub fn open_default() -> Result<Self, JudgeError> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Credentials, JudgeError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "settings file absent, using defaults");
            return Ok(Credentials::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let stored: StoredSettings = serde_json::from_str(&raw).map_err(|e| {
            JudgeError::ConfigurationError(format!(
                "invalid settings file {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(stored.into())
    }

    fn save(&self, credentials: &Credentials) -> Result<(), JudgeError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&credentials.to_stored())?;
        std::fs::write(&self.path, json)?;
        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// In-process store, mainly for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<StoredSettings>,
}

impl MemoryCredentialStore {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            inner: Mutex::new(credentials.to_stored()),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Credentials, JudgeError> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| JudgeError::ConfigurationError("settings lock poisoned".to_string()))?;
        Ok(guard.clone().into())
    }

    fn save(&self, credentials: &Credentials) -> Result<(), JudgeError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| JudgeError::ConfigurationError("settings lock poisoned".to_string()))?;
        *guard = credentials.to_stored();
        Ok(())
    }
}

/// Outcome class of a format check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warn,
    Err,
}

/// Result of an advisory, client-side format check. Never authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCheck {
    pub status: CheckStatus,
    pub message: &'static str,
}

impl KeyCheck {
    const fn new(status: CheckStatus, message: &'static str) -> Self {
        Self { status, message }
    }
}

pub fn check_anthropic_key(key: &str) -> KeyCheck {
    let key = key.trim();
    if key.is_empty() {
        KeyCheck::new(CheckStatus::Warn, "Empty (will disable Anthropic).")
    } else if key.starts_with("sk-ant-") {
        KeyCheck::new(CheckStatus::Ok, "Looks valid (prefix).")
    } else {
        KeyCheck::new(
            CheckStatus::Warn,
            "Unusual format: Anthropic keys typically start with sk-ant-.",
        )
    }
}

pub fn check_gemini_key(key: &str) -> KeyCheck {
    let key = key.trim();
    if key.is_empty() {
        KeyCheck::new(CheckStatus::Warn, "Empty (will disable Gemini).")
    } else if key.starts_with("AIza") {
        KeyCheck::new(CheckStatus::Ok, "Looks valid (prefix).")
    } else {
        KeyCheck::new(
            CheckStatus::Warn,
            "Unusual format: many Google API keys start with AIza.",
        )
    }
}

pub fn check_huggingface_token(token: &str) -> KeyCheck {
    let token = token.trim();
    if token.is_empty() {
        KeyCheck::new(
            CheckStatus::Warn,
            "Optional: requests may work on public models.",
        )
    } else if token.starts_with("hf_") {
        KeyCheck::new(CheckStatus::Ok, "Looks valid (prefix).")
    } else {
        KeyCheck::new(
            CheckStatus::Warn,
            "Unusual format: HF tokens typically start with hf_.",
        )
    }
}

pub fn check_hf_model_id(model_id: &str) -> KeyCheck {
    let model_id = model_id.trim();
    if model_id.is_empty() {
        return KeyCheck::new(
            CheckStatus::Err,
            "Required: e.g., maskitplugin/finetuned_roberta.",
        );
    }
    let well_formed = Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$")
        .map(|re| re.is_match(model_id))
        .unwrap_or(false);
    if well_formed {
        KeyCheck::new(CheckStatus::Ok, "Model id looks well-formed.")
    } else {
        KeyCheck::new(
            CheckStatus::Warn,
            "Model id should look like org-or-user/model-name.",
        )
    }
}
