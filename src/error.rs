//! Error types for Respawn
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Respawn operations
pub type RespawnResult<T> = Result<T, RespawnError>;

/// Main error type for Respawn operations
#[derive(Error, Debug)]
pub enum RespawnError {
    /// Main file does not exist or is not a file
    #[error("main file not found: {path}")]
    MainFileNotFound { path: PathBuf },

    /// Malformed `--files-to-watch` list
    #[error("invalid pattern list '{input}': {message}")]
    InvalidPatternList { input: String, message: String },

    /// Child process could not be spawned
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// File enumeration failed (fatal for watch setup)
    #[error("file enumeration failed: {0}")]
    Walk(#[from] ignore::Error),

    /// Watch subscription failed
    #[error("watch subscription failed: {0}")]
    Notify(#[from] notify::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
