//! Error types for dk-core

use std::path::PathBuf;

/// Result type for dk-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dk-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No configuration file at the requested location
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file could not be parsed
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Configuration parsed but is not a valid link mapping
    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    /// No platform directory to place the default configuration in
    #[error("Could not determine the user configuration directory")]
    NoConfigDir,

    /// The confirmation capability failed to produce an answer
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// A restored file does not match the copy taken before modification
    #[error("Restored file {path} does not match its backup")]
    Integrity { path: PathBuf },

    /// Filesystem error from dk-fs
    #[error(transparent)]
    Fs(#[from] dk_fs::Error),

    /// YAML serialization error
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }
}
