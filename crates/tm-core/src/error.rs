//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file does not exist: {path}")]
    ConfigNotFound { path: String },

    /// E002: Configuration file already present (init)
    #[error("[E002] Config file already exists: {path}")]
    ConfigExists { path: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: A `{ env: NAME }` setting points at an unset variable
    #[error("[E004] Environment variable '{name}' referenced by '{setting}' is not set")]
    MissingEnvVar { name: String, setting: String },

    /// E005: Invalid migration identifier
    #[error("[E005] Invalid migration identifier: {reason}")]
    InvalidMigrationId { reason: String },

    /// E006: IO error with file path context
    #[error("[E006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E007: YAML parse error
    #[error("[E007] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
