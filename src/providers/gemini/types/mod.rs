//! Gemini request types and configuration

mod config;
mod generation;

pub use config::*;
pub use generation::*;
