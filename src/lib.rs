//! # claim-judge
//!
//! Three-way factuality classification of short claims (`true`, `uncertain`,
//! `false`) through interchangeable backends.
//!
#![deny(unsafe_code)]

//! ## Providers
//!
//! - **Anthropic**: Messages API with extended thinking, a capped web-search tool and a
//!   structured `emit_judgment` tool.
//! - **Gemini**: `generateContent` with Google Search grounding, verdict returned as JSON text.
//! - **HuggingFace (local)**: an in-process text classifier, label only.
//!
//! Each backend answers in its own shape; the adapter reduces all of them to one
//! [`ClassificationResult`](types::ClassificationResult) and, at the caller boundary,
//! to an [`Outcome`](types::Outcome).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use claim_judge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let judge = ClaimJudge::new();
//!     let credentials = Credentials::default().with_gemini_key("AIza...");
//!
//!     let req = ClassificationRequest::new(ProviderKind::Gemini, "Water boils at 100 C at sea level.")
//!         .with_speaker("Science teacher");
//!     let result = judge.classify(&req, &credentials).await?;
//!     println!("{}: {}", result.label, result.reasoning);
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod executors;
pub mod extract;
pub mod prompt;
pub mod providers;
pub mod telemetry;
pub mod transformers;
pub mod types;
pub mod utils;

pub use adapter::ClaimJudge;
pub use error::{ErrorKind, JudgeError};
pub use types::{ClassificationRequest, ClassificationResult, ClassifyParams, Label, Outcome, ProviderKind};

/// Commonly used items.
pub mod prelude {
    pub use crate::adapter::ClaimJudge;
    pub use crate::config::{
        CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore,
    };
    pub use crate::error::{ErrorKind, JudgeError};
    pub use crate::executors::Classifier;
    pub use crate::providers::{AnthropicConfig, GeminiConfig, PipelineLoader, TextClassifier};
    pub use crate::types::{
        ClassificationRequest, ClassificationResult, ClassifyParams, Label, Outcome, ProviderKind,
    };
}
