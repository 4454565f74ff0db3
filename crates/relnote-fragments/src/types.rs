//! Fragment types

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use relnote_core::config::{NOTE_EXTENSION, SUFFIX_LEN};
use relnote_core::Result;
use serde::{Deserialize, Serialize};

/// A pending fragment file in the staging directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Full path to the file
    pub path: PathBuf,
    /// File name including extension
    pub file_name: String,
}

impl Fragment {
    /// Build a fragment from a path, if it has a UTF-8 file name
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let file_name = path.file_name()?.to_str()?.to_string();
        Some(Self { path, file_name })
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }

    /// Split the stem into `(title, suffix)` when it follows `<title>-<hex suffix>`
    pub fn title_and_suffix(&self) -> Option<(&str, &str)> {
        let (title, suffix) = self.stem().rsplit_once('-')?;
        let is_suffix =
            suffix.len() == SUFFIX_LEN && suffix.chars().all(|c| c.is_ascii_hexdigit());
        (is_suffix && !title.is_empty()).then_some((title, suffix))
    }

    /// Human title, falling back to the whole stem
    pub fn title(&self) -> &str {
        self.title_and_suffix()
            .map(|(title, _)| title)
            .unwrap_or_else(|| self.stem())
    }

    /// File name of the note record compiled from this fragment
    pub fn note_file_name(&self) -> String {
        format!("{}.{}", self.stem(), NOTE_EXTENSION)
    }
}

/// A named region of a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text, trimmed
    pub name: String,
    /// Raw lines under the heading, terminators included
    pub body: String,
}

impl Section {
    /// Create an empty section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: String::new(),
        }
    }
}

/// Sections of one fragment, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFragment {
    /// Sections keyed by unique name
    pub sections: Vec<Section>,
}

impl ParsedFragment {
    /// Create an empty parse result
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a section, or return the existing one with the same name
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    /// Look up a section by name
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Section names in order of first appearance
    pub fn names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Whether no heading was found
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Structured output for one fragment: section name to a one-element list
/// holding the converted section body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteRecord {
    entries: BTreeMap<String, Vec<String>>,
}

impl NoteRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the converted body of a section
    pub fn insert(&mut self, section: impl Into<String>, converted: impl Into<String>) {
        self.entries.insert(section.into(), vec![converted.into()]);
    }

    /// Converted body of a section
    pub fn get(&self, section: &str) -> Option<&str> {
        self.entries
            .get(section)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Section names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no sections
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a block-style YAML document.
    ///
    /// Keys and items that a YAML 1.1 reader would take for booleans are
    /// single-quoted so they load back as strings.
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        let mut out = String::with_capacity(yaml.len());
        for line in yaml.split_inclusive('\n') {
            let (content, newline) = match line.strip_suffix('\n') {
                Some(content) => (content, "\n"),
                None => (line, ""),
            };
            if let Some(key) = content.strip_suffix(':').filter(|k| is_yaml11_bool(k)) {
                out.push_str(&format!("'{}':{}", key, newline));
            } else if let Some(item) = content.strip_prefix("- ").filter(|i| is_yaml11_bool(i)) {
                out.push_str(&format!("- '{}'{}", item, newline));
            } else {
                out.push_str(line);
            }
        }
        Ok(out)
    }
}

/// Plain scalars YAML 1.1 resolves to booleans
const YAML11_BOOLS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "true", "True", "TRUE", "false",
    "False", "FALSE", "on", "On", "ON", "off", "Off", "OFF",
];

fn is_yaml11_bool(scalar: &str) -> bool {
    YAML11_BOOLS.contains(&scalar)
}
