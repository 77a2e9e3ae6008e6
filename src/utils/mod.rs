//! Utility modules shared by the provider strategies.

pub mod http_headers;

pub use http_headers::HttpHeaderBuilder;
