//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::types::{ConverterBackend, Dialect};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_layout(config)?;
    validate_convert(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

fn validate_layout(config: &Config) -> Result<()> {
    if config.staging_dir.as_os_str().is_empty() {
        return Err(invalid("staging_dir", "staging directory cannot be empty").into());
    }

    if config.notes_dir.as_os_str().is_empty() {
        return Err(invalid("notes_dir", "notes directory cannot be empty").into());
    }

    if config.staging_dir == config.notes_dir {
        return Err(invalid("notes_dir", "must differ from staging_dir").into());
    }

    if config.extension.is_empty() || config.extension.starts_with('.') {
        return Err(invalid("extension", "must be a non-empty extension without a leading dot").into());
    }

    if config.heading_marker.is_empty() {
        return Err(invalid("heading_marker", "heading marker cannot be empty").into());
    }

    Ok(())
}

fn validate_convert(config: &Config) -> Result<()> {
    let convert = &config.convert;
    if convert.backend == ConverterBackend::Native
        && convert.from != convert.to
        && !(convert.from.is_markdown() && convert.to == Dialect::Rst)
    {
        return Err(invalid(
            "convert.backend",
            format!(
                "native backend cannot convert {} to {}; use pandoc",
                convert.from, convert.to
            ),
        )
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_same_staging_and_notes_dir() {
        let config = Config {
            notes_dir: PathBuf::from(".changelog"),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_dotted_extension() {
        let config = Config {
            extension: ".md".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_native_backend_pairs() {
        let mut config = Config::default();
        config.convert.backend = ConverterBackend::Native;
        assert!(validate_config(&config).is_ok());

        config.convert.from = Dialect::Gfm;
        assert!(validate_config(&config).is_ok());

        config.convert.to = Dialect::Gfm;
        assert!(validate_config(&config).is_ok());

        config.convert.to = Dialect::Html;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_pandoc_backend_accepts_any_pair() {
        let mut config = Config::default();
        config.convert.backend = ConverterBackend::Pandoc;
        config.convert.to = Dialect::Html;
        assert!(validate_config(&config).is_ok());
    }
}
