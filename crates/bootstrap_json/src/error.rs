use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BootstrapError>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status from {url}: {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("response from {source_name} has no `bootstrap` field")]
    MissingBootstrap { source_name: String },

    #[error("bootstrap document is already loaded for this build")]
    AlreadyLoaded,

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl BootstrapError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
