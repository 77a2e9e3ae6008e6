//! Google Gemini grounded-generation provider

pub mod transformers;
pub mod types;

pub use transformers::GeminiStrategy;
pub use types::GeminiConfig;
