//! Error types for Tutorbot.

use thiserror::Error;

/// Library-level error type for Tutorbot operations.
#[derive(Error, Debug)]
pub enum TutorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Embedding file error: {0}")]
    Corpus(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Answer generation failed: {0}")]
    Rag(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Tutorbot operations.
pub type Result<T> = std::result::Result<T, TutorError>;
