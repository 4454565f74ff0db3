//! Error types for relnote

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using RelnoteError
pub type Result<T> = std::result::Result<T, RelnoteError>;

/// Main error type for relnote operations
#[derive(Debug, Error)]
pub enum RelnoteError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fragment lifecycle errors
    #[error(transparent)]
    Fragment(#[from] FragmentError),

    /// Markup conversion errors
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while creating, reading or compiling fragments
#[derive(Debug, Error)]
pub enum FragmentError {
    /// Title cannot be used as part of a file name
    #[error("Invalid fragment title '{title}': {reason}")]
    InvalidTitle { title: String, reason: String },

    /// A fragment with the generated name already exists
    #[error("Fragment already exists: {0}")]
    AlreadyExists(PathBuf),

    /// Failed to read a fragment or list the staging directory
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a fragment or note record
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete a compiled fragment
    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Editor process could not be started
    #[error("Failed to launch editor '{editor}': {source}")]
    EditorLaunch {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    /// Editor exited unsuccessfully
    #[error("Editor '{editor}' exited with status {}", exit_status(.code))]
    EditorFailed { editor: String, code: Option<i32> },

    /// Some fragments failed while the batch kept going
    #[error("{failed} of {total} fragments failed to compile")]
    BatchFailed { failed: usize, total: usize },
}

fn exit_status(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

/// Markup conversion errors
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Backend cannot convert between the requested dialects
    #[error("{backend} cannot convert {from} to {to}")]
    Unsupported {
        backend: String,
        from: String,
        to: String,
    },

    /// External conversion tool is not installed
    #[error("Conversion tool not found: {0}")]
    ToolNotFound(String),

    /// External conversion tool could not be started or talked to
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Conversion ran but failed
    #[error("{backend} conversion failed: {message}")]
    Failed { backend: String, message: String },

    /// Conversion produced output that is not valid UTF-8
    #[error("{0} produced invalid UTF-8 output")]
    InvalidOutput(String),
}
