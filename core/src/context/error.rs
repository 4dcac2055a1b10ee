//! Error types for context operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to load configuration from {path}")]
    LoadPath {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),
}

/// Errors talking to a running game service
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("game service has stopped")]
    Stopped,
}
