//! AppSpec error types

use std::path::PathBuf;
use thiserror::Error;

/// AppSpec errors
#[derive(Debug, Error)]
pub enum AppSpecError {
    #[error("Failed to read AppSpec file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("AppSpec file {} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error("Failed to parse AppSpec file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("AppSpec file has no Resources entry with a Properties block")]
    NoTargetService,

    #[error("Failed to encode AppSpec content: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for AppSpec operations
pub type Result<T> = std::result::Result<T, AppSpecError>;
