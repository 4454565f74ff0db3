//! Relnote Core - Shared foundations for release-note fragment management
//!
//! This crate provides the error taxonomy, the project configuration model and
//! the small set of enums shared by the fragment tooling and the CLI.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, ConvertError, FragmentError, RelnoteError, Result};
pub use types::{ConverterBackend, Dialect, FailurePolicy};
