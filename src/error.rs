use std::path::PathBuf;

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error when a named profile does not exist in the store
    #[error("profile not found: '{0}'")]
    ProfileNotFound(String),
    /// Error when adding a profile whose name is already taken
    #[error("profile already exists: '{0}'")]
    DuplicateProfile(String),
    /// Error when the profiles file exists but cannot be parsed
    #[error("profiles file is corrupt: {0}")]
    CorruptStore(#[source] serde_json::Error),
    /// Error writing the profiles file to disk
    #[error("failed to write profiles file '{path}': {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Error when a `git config --global` call fails
    #[error("git config --global {key} failed: {reason}")]
    GitConfig { key: String, reason: String },
    /// Soft failure: the SSH agent rejected the key or is not running
    #[error("ssh agent unavailable: {0}")]
    AgentUnavailable(String),
    /// The git identity was applied but recording the switch failed
    #[error("git identity applied, but saving the profiles file failed: {0}")]
    InconsistentState(#[source] Box<AppError>),
    /// Error when an external command exceeds its wall-clock budget
    #[error("'{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },
    /// Error during general file I/O or process spawning
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during input validation
    #[error("validation error: {0}")]
    Validation(String),
    /// Error when user input fails
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
}
