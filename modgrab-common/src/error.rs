use std::sync::Arc;

use thiserror::Error;

use crate::graph::Conflict;

#[derive(Error, Debug, Clone)]
pub enum ModError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("'{0}' is not a valid Modrinth slug or project id")]
    InvalidSlug(String),

    #[error("{message}")]
    NotFound { target: String, message: String },

    #[error("{0}")]
    Incompatible(Conflict),

    #[error("integrity mismatch for {filename}: expected sha512 {expected}, got {actual}")]
    IntegrityMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    #[error("API Error: {0}")]
    Api(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("State Error: {0}")]
    State(String),
}

impl ModError {
    pub fn not_found(target: impl Into<String>, message: impl Into<String>) -> Self {
        ModError::NotFound {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Domain errors are collected per phase and reported in aggregate after
    /// the phase barrier. Everything else is transport/fault class and aborts
    /// the run immediately.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            ModError::InvalidSlug(_)
                | ModError::NotFound { .. }
                | ModError::Incompatible(_)
                | ModError::IntegrityMismatch { .. }
        )
    }
}

impl From<std::io::Error> for ModError {
    fn from(err: std::io::Error) -> Self {
        ModError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for ModError {
    fn from(err: reqwest::Error) -> Self {
        ModError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for ModError {
    fn from(err: serde_json::Error) -> Self {
        ModError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ModError>;
