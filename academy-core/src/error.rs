//! Error types for academy-core

use thiserror::Error;

/// Main error type for the academy-core library.
///
/// The generation functions themselves are total and never fail; errors only
/// arise in the ambient layers (configuration, logging, the optional
/// workflow engine).
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Workflow engine error
    #[error("workflow engine error: {0}")]
    Workflow(String),
}

/// Result type alias for academy-core
pub type Result<T> = std::result::Result<T, Error>;
