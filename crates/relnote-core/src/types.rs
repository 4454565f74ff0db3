//! Shared enums

use std::fmt;

use serde::{Deserialize, Serialize};

/// A text markup dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Pandoc's extended markdown
    Markdown,
    /// GitHub-flavored markdown
    Gfm,
    /// Strict CommonMark
    Commonmark,
    /// reStructuredText
    Rst,
    /// HTML
    Html,
    /// Plain text
    Plain,
}

impl Dialect {
    /// Name understood by pandoc's `--from`/`--to`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Gfm => "gfm",
            Self::Commonmark => "commonmark",
            Self::Rst => "rst",
            Self::Html => "html",
            Self::Plain => "plain",
        }
    }

    /// Whether this dialect is one of the markdown family
    pub fn is_markdown(&self) -> bool {
        matches!(self, Self::Markdown | Self::Gfm | Self::Commonmark)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which converter implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterBackend {
    /// Pandoc when installed, otherwise the built-in renderer
    #[default]
    Auto,
    /// Always shell out to pandoc
    Pandoc,
    /// Always use the built-in renderer
    Native,
}

/// What a batch compile does when one fragment fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failing fragment
    #[default]
    Abort,
    /// Skip the failing fragment, compile the rest, report at the end
    Continue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_markdown_family() {
        assert!(Dialect::Gfm.is_markdown());
        assert!(Dialect::Commonmark.is_markdown());
        assert!(!Dialect::Rst.is_markdown());
    }

    #[test]
    fn test_serde_names() {
        let yaml = serde_yaml::to_string(&Dialect::Rst).unwrap();
        assert_eq!(yaml.trim(), "rst");
        let policy: FailurePolicy = serde_yaml::from_str("continue").unwrap();
        assert_eq!(policy, FailurePolicy::Continue);
    }
}
