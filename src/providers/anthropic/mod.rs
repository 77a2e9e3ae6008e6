//! Anthropic tool-calling provider
//!
//! The model is given extended thinking, a capped web-search server tool and the
//! `emit_judgment` client tool. The verdict is read from the tool call first and
//! from JSON reply text second.

pub mod config;
pub mod transformers;
pub mod types;

pub use config::AnthropicConfig;
pub use transformers::AnthropicStrategy;
