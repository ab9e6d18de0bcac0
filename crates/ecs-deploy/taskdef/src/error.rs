//! Task definition error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a task definition from disk
#[derive(Debug, Error)]
pub enum TaskDefError {
    #[error("Failed to read task definition {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Task definition {} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error("Failed to parse task definition {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result type for task definition operations
pub type Result<T> = std::result::Result<T, TaskDefError>;
