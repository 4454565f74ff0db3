//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{ConverterBackend, Dialect, FailurePolicy};

/// Main configuration for relnote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding fragments that have not been compiled yet
    pub staging_dir: PathBuf,

    /// Directory compiled note records are written to
    pub notes_dir: PathBuf,

    /// Fragment file extension (without the dot)
    pub extension: String,

    /// Line prefix that starts a new section
    pub heading_marker: String,

    /// Editor command, takes precedence over `EDITOR`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Behavior when a fragment fails to compile
    pub on_error: FailurePolicy,

    /// Markup conversion configuration
    pub convert: ConvertConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from(".changelog"),
            notes_dir: PathBuf::from("releasenotes").join("notes"),
            extension: "md".to_string(),
            heading_marker: "# ".to_string(),
            editor: None,
            on_error: FailurePolicy::default(),
            convert: ConvertConfig::default(),
        }
    }
}

impl Config {
    /// Staging directory resolved against a project root
    pub fn staging_path(&self, root: &Path) -> PathBuf {
        root.join(&self.staging_dir)
    }

    /// Notes output directory resolved against a project root
    pub fn notes_path(&self, root: &Path) -> PathBuf {
        root.join(&self.notes_dir)
    }
}

/// Markup conversion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Converter implementation
    pub backend: ConverterBackend,

    /// Dialect fragments are written in
    pub from: Dialect,

    /// Dialect note records are emitted in
    pub to: Dialect,

    /// Explicit pandoc executable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pandoc: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            backend: ConverterBackend::default(),
            from: Dialect::Markdown,
            to: Dialect::Rst,
            pandoc: None,
        }
    }
}
