//! Error types for the byte-pair tokenizer library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tokenizer library.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Invalid training or tokenizer configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Empty training input, rejected by caller configuration
    #[error("Training input is empty")]
    EmptyInput,

    /// Unknown token ID
    #[error("Unknown token ID: {0}")]
    UnknownTokenId(u32),

    /// Merge rule inconsistent with the vocabulary it claims to build
    #[error("Invalid merge rule: {0}")]
    InvalidMerge(String),

    /// Error loading a model
    #[error("Load error: {0}")]
    Load(String),

    /// Error saving a model
    #[error("Save error: {0}")]
    Save(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
