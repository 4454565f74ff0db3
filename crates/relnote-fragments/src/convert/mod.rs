//! Markup conversion

mod native;
mod pandoc;

pub use native::{markdown_to_rst, NativeConverter};
pub use pandoc::PandocConverter;

use relnote_core::config::ConvertConfig;
use relnote_core::{ConvertError, ConverterBackend, Dialect, Result};
use tracing::{debug, info};

/// Converts text from one markup dialect to another.
///
/// Implementations must behave as pure functions of their inputs.
pub trait MarkupConverter: Send + Sync {
    /// Short backend name for logs and messages
    fn name(&self) -> &'static str;

    /// Convert `text` written in `from` into `to`
    fn convert(&self, text: &str, from: Dialect, to: Dialect) -> Result<String>;
}

/// Build the converter selected by configuration
pub fn converter_for(config: &ConvertConfig) -> Result<Box<dyn MarkupConverter>> {
    let converter: Box<dyn MarkupConverter> = match config.backend {
        ConverterBackend::Pandoc => Box::new(PandocConverter::locate(config.pandoc.as_deref())?),
        ConverterBackend::Native => Box::new(NativeConverter::new()),
        ConverterBackend::Auto => match PandocConverter::locate(config.pandoc.as_deref()) {
            Ok(pandoc) => Box::new(pandoc),
            Err(_) if NativeConverter::supports(config.from, config.to) => {
                debug!("pandoc not found, falling back to native converter");
                Box::new(NativeConverter::new())
            }
            Err(_) => return Err(ConvertError::ToolNotFound("pandoc".to_string()).into()),
        },
    };

    info!(
        backend = converter.name(),
        from = %config.from,
        to = %config.to,
        "markup converter selected"
    );
    Ok(converter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relnote_core::RelnoteError;
    use std::path::PathBuf;

    #[test]
    fn test_native_backend() {
        let config = ConvertConfig {
            backend: ConverterBackend::Native,
            ..ConvertConfig::default()
        };
        let converter = converter_for(&config).unwrap();
        assert_eq!(converter.name(), "native");
    }

    #[test]
    fn test_pandoc_backend_with_missing_binary() {
        let config = ConvertConfig {
            backend: ConverterBackend::Pandoc,
            pandoc: Some(PathBuf::from("/nonexistent/pandoc")),
            ..ConvertConfig::default()
        };
        let err = converter_for(&config).err().unwrap();
        assert!(matches!(
            err,
            RelnoteError::Convert(ConvertError::ToolNotFound(_))
        ));
    }

    #[test]
    fn test_auto_falls_back_to_native() {
        let config = ConvertConfig {
            backend: ConverterBackend::Auto,
            pandoc: Some(PathBuf::from("/nonexistent/pandoc")),
            ..ConvertConfig::default()
        };
        assert_eq!(converter_for(&config).unwrap().name(), "native");
    }

    #[test]
    fn test_auto_without_pandoc_for_unsupported_pair() {
        let config = ConvertConfig {
            backend: ConverterBackend::Auto,
            to: Dialect::Html,
            pandoc: Some(PathBuf::from("/nonexistent/pandoc")),
            ..ConvertConfig::default()
        };
        assert!(converter_for(&config).is_err());
    }
}
