//! Error types shared across clipmark crates.

use std::path::PathBuf;

/// Top-level error type for clipmark operations.
#[derive(Debug, thiserror::Error)]
pub enum ClipmarkError {
    #[error("Usage error: {message}")]
    Usage { message: String },

    #[error("Player query error: {message}")]
    Player { message: String },

    #[error("Mark log error: {message}")]
    MarkLog { message: String },

    #[error("Manifest error: {message}")]
    Manifest { message: String },

    #[error("Extraction error: {message}")]
    Extract { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Result type alias using ClipmarkError.
pub type ClipmarkResult<T> = Result<T, ClipmarkError>;

impl ClipmarkError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage {
            message: msg.into(),
        }
    }

    pub fn player(msg: impl Into<String>) -> Self {
        Self::Player {
            message: msg.into(),
        }
    }

    pub fn mark_log(msg: impl Into<String>) -> Self {
        Self::MarkLog {
            message: msg.into(),
        }
    }

    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest {
            message: msg.into(),
        }
    }

    pub fn extract(msg: impl Into<String>) -> Self {
        Self::Extract {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
