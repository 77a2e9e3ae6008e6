//! HTTP Headers Utility
//!
//! Common utilities for building HTTP headers across providers.

use crate::error::JudgeError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add a credential header (e.g., `x-api-key` for Anthropic).
    ///
    /// The value is marked sensitive so it is redacted from `Debug` output.
    pub fn with_custom_auth(mut self, header_name: &str, value: &str) -> Result<Self, JudgeError> {
        let name = HeaderName::from_bytes(header_name.as_bytes()).map_err(|e| {
            JudgeError::ConfigurationError(format!("Invalid header name '{header_name}': {e}"))
        })?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| JudgeError::ConfigurationError(format!("Invalid API key format: {e}")))?;
        value.set_sensitive(true);
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add JSON content type
    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, JudgeError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            JudgeError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
        })?;
        self.headers.insert(
            header_name,
            HeaderValue::from_str(value).map_err(|e| {
                JudgeError::ConfigurationError(format!("Invalid header value '{value}': {e}"))
            })?,
        );
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_auth_is_marked_sensitive() {
        let headers = HttpHeaderBuilder::new()
            .with_custom_auth("x-api-key", "secret")
            .unwrap()
            .with_json_content_type()
            .build();
        let value = headers.get("x-api-key").unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().ok(), Some("secret"));
        assert_eq!(
            headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[test]
    fn invalid_header_value_is_a_configuration_error() {
        let err = HttpHeaderBuilder::new()
            .with_custom_auth("x-api-key", "bad\nkey")
            .err()
            .unwrap();
        assert!(matches!(err, JudgeError::ConfigurationError(_)));
    }
}
