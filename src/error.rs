//! Error Handling Module
//!
//! A single error type covers every way a classification can fail. The
//! `Display` output of each variant is the message the caller renders verbatim,
//! so variants carry the provider display name where the message needs it.
//!
//! # Example
//!
//! ```rust,ignore
//! use claim_judge::error::{ErrorKind, JudgeError};
//!
//! let err = JudgeError::api_error("Gemini", 429, "quota exhausted");
//! assert_eq!(err.kind(), ErrorKind::Transport);
//! assert_eq!(err.status_code(), Some(429));
//! ```

use thiserror::Error;

/// Errors produced while building, issuing or interpreting a classification.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// A credentialed provider was selected without a stored API key.
    #[error("Missing {provider} API key. Set it with `claim-judge config set`.")]
    MissingApiKey { provider: &'static str },

    /// The provider answered with a non-success HTTP status.
    #[error("{provider} HTTP {status}: {body}")]
    ApiError {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The request never produced an HTTP response.
    #[error("{provider} request failed: {message}")]
    HttpError {
        provider: &'static str,
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("{provider}: invalid response body: {message}")]
    ParseError {
        provider: &'static str,
        message: String,
    },

    /// A response arrived but no extractor found a conforming result.
    #[error("{provider}: No structured result found.")]
    NoStructuredResult { provider: &'static str },

    /// The caller named a provider this crate does not know.
    #[error("Unknown provider.")]
    UnknownProvider(String),

    /// Model load or inference failure in the local pipeline.
    #[error("HuggingFace error: {0}")]
    LocalPipeline(String),

    /// The request itself is unusable (for example an empty sentence).
    #[error("{0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse error kind for presentation and programmatic branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingCredential,
    Transport,
    Parse,
    UnknownProvider,
    LocalPipeline,
    Validation,
    Configuration,
}

impl JudgeError {
    pub fn api_error(provider: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            body: body.into(),
        }
    }

    pub fn http_error(provider: &'static str, message: impl Into<String>) -> Self {
        Self::HttpError {
            provider,
            message: message.into(),
        }
    }

    pub fn parse_error(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ParseError {
            provider,
            message: message.into(),
        }
    }

    pub fn local_pipeline(message: impl Into<String>) -> Self {
        Self::LocalPipeline(message.into())
    }

    /// Map the error to its presentation kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey { .. } => ErrorKind::MissingCredential,
            Self::ApiError { .. } | Self::HttpError { .. } => ErrorKind::Transport,
            Self::ParseError { .. } | Self::NoStructuredResult { .. } => ErrorKind::Parse,
            Self::UnknownProvider(_) => ErrorKind::UnknownProvider,
            Self::LocalPipeline(_) => ErrorKind::LocalPipeline,
            Self::InvalidInput(_) => ErrorKind::Validation,
            Self::ConfigurationError(_) | Self::IoError(_) => ErrorKind::Configuration,
        }
    }

    /// HTTP status code when the provider returned one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for JudgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigurationError(format!("JSON error: {err}"))
    }
}
