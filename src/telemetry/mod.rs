//! Telemetry and tracing utilities
//!
//! Subscriber initialization for binaries embedding the adapter. Library code
//! only emits `tracing` events; installing a subscriber is the caller's choice.
//!
//! ## Example
//!
//! ```rust,ignore
//! use claim_judge::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! init_subscriber(config)?;
//! ```

use std::str::FromStr;

use crate::error::JudgeError;

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "CLAIM_JUDGE_LOG_LEVEL";
/// Environment variable holding the output format.
pub const LOG_FORMAT_ENV: &str = "CLAIM_JUDGE_LOG_FORMAT";

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format
    Json,
    /// Compact JSON format
    JsonCompact,
}

impl FromStr for OutputFormat {
    type Err = JudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "json-compact" => Ok(OutputFormat::JsonCompact),
            _ => Err(JudgeError::ConfigurationError(format!(
                "Invalid log format: {s}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Parse a level name (`trace`, `debug`, `info`, `warn`, `error`).
pub fn parse_level(level: &str) -> Result<tracing::Level, JudgeError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        _ => Err(JudgeError::ConfigurationError(format!(
            "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
        ))),
    }
}

/// Configuration for tracing subscriber
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::WARN,
            output_format: OutputFormat::Text,
        }
    }
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Debug-level text output.
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            output_format: OutputFormat::Text,
        }
    }

    /// Directive string handed to the `EnvFilter`.
    pub fn filter_directive(&self) -> String {
        format!("claim_judge={}", self.log_level.as_str().to_lowercase())
    }
}

/// Builder for SubscriberConfig
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
}

impl SubscriberConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string
    pub fn log_level_str(mut self, level: &str) -> Result<Self, JudgeError> {
        self.log_level = Some(parse_level(level)?);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn build(self) -> SubscriberConfig {
        let defaults = SubscriberConfig::default();
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(defaults.log_level),
            output_format: self.output_format.unwrap_or(defaults.output_format),
        }
    }
}

/// Install a global `fmt` subscriber writing to stderr.
///
/// Calling this when a global subscriber already exists is not an error.
pub fn init_subscriber(config: SubscriberConfig) -> Result<(), JudgeError> {
    let filter = config.filter_directive();

    let init_result = match config.output_format {
        OutputFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
            .try_init(),
        OutputFormat::JsonCompact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
            .flatten_event(true)
            .try_init(),
        OutputFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init(),
    };

    match init_result {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_msg = e.to_string();
            if error_msg.contains("global default trace dispatcher has already been set")
                || error_msg.contains("logging system was already initialized")
            {
                Ok(())
            } else {
                Err(JudgeError::ConfigurationError(format!(
                    "Failed to initialize tracing: {e}"
                )))
            }
        }
    }
}

/// Build a config from `CLAIM_JUDGE_LOG_LEVEL` and `CLAIM_JUDGE_LOG_FORMAT`.
pub fn config_from_env() -> Result<SubscriberConfig, JudgeError> {
    let mut builder = SubscriberConfig::builder();

    if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
        builder = builder.log_level_str(&level)?;
    }
    if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
        builder = builder.output_format(format.parse()?);
    }

    Ok(builder.build())
}

/// Initialize tracing subscriber from environment variables
pub fn init_from_env() -> Result<(), JudgeError> {
    init_subscriber(config_from_env()?)
}
