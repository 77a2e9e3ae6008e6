//! Executors Layer
//!
//! HTTP orchestration that wires provider strategies with the network, plus the
//! [`Classifier`] abstraction every backend implements.

pub mod classify;

pub use classify::{Classifier, HttpClassifier};
