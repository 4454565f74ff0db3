//! Fragment section parser

use tracing::{debug, instrument};

use crate::types::ParsedFragment;

/// Default section heading prefix
pub const DEFAULT_HEADING_MARKER: &str = "# ";

/// Splits fragment text into named sections.
///
/// A line starting with the heading marker opens (or reopens) the section
/// named by the rest of the line, trimmed. Every other line is appended
/// verbatim, terminator included, to the open section. Lines before the first
/// heading belong to no section and are dropped.
#[derive(Debug, Clone)]
pub struct FragmentParser {
    marker: String,
}

impl FragmentParser {
    /// Create a parser using the given heading marker
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The heading marker in use
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Parse fragment text into sections
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub fn parse(&self, text: &str) -> ParsedFragment {
        let mut parsed = ParsedFragment::new();
        let mut current: Option<String> = None;
        let mut dropped = 0usize;

        for line in text.split_inclusive('\n') {
            if let Some(rest) = line.strip_prefix(self.marker.as_str()) {
                let name = rest.trim().to_string();
                parsed.section_mut(&name);
                current = Some(name);
            } else if let Some(name) = &current {
                parsed.section_mut(name).body.push_str(line);
            } else {
                dropped += 1;
            }
        }

        debug!(
            sections = parsed.sections.len(),
            dropped_lines = dropped,
            "fragment parsed"
        );
        parsed
    }
}

impl Default for FragmentParser {
    fn default() -> Self {
        Self::new(DEFAULT_HEADING_MARKER)
    }
}
