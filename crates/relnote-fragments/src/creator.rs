//! Fragment creation

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use relnote_core::config::SUFFIX_LEN;
use relnote_core::{FragmentError, Result};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::store::FragmentStore;
use crate::types::Fragment;

/// Environment variable naming the user's editor
pub const EDITOR_ENV: &str = "EDITOR";

/// How a freshly created fragment gets filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    /// Spawn this command with the fragment path and wait for it to exit
    Command(String),
    /// Tell the user to edit the file themselves
    Manual,
}

impl EditorMode {
    /// Pick the editor from an explicit choice, the configured one, or `EDITOR`
    pub fn resolve(explicit: Option<&str>, configured: Option<&str>) -> Self {
        let env = std::env::var(EDITOR_ENV).ok();
        Self::from_sources(explicit, configured, env.as_deref())
    }

    /// First non-blank value wins; nothing set means manual editing
    pub fn from_sources(
        explicit: Option<&str>,
        configured: Option<&str>,
        env: Option<&str>,
    ) -> Self {
        [explicit, configured, env]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(|value| Self::Command(value.to_string()))
            .unwrap_or(Self::Manual)
    }
}

/// What happened after a fragment was created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The editor ran and exited successfully
    Edited,
    /// No editor configured
    Manual,
}

/// Creates empty fragments in the staging directory
#[derive(Debug, Clone)]
pub struct FragmentCreator {
    store: FragmentStore,
}

impl FragmentCreator {
    /// Create fragments in the given store
    pub fn new(store: FragmentStore) -> Self {
        Self { store }
    }

    /// Create an empty `<title>-<suffix>.<ext>` fragment
    #[instrument(skip(self))]
    pub fn create(&self, title: &str) -> Result<Fragment> {
        validate_title(title)?;
        self.store.ensure_dir()?;

        let file_name = format!("{}-{}.{}", title, generate_suffix(), self.store.extension());
        let path = self.store.dir().join(&file_name);

        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| match source.kind() {
                ErrorKind::AlreadyExists => FragmentError::AlreadyExists(path.clone()),
                _ => FragmentError::Write {
                    path: path.clone(),
                    source,
                },
            })?;

        info!(path = %path.display(), "fragment created");
        Ok(Fragment {
            path,
            file_name,
        })
    }

    /// Open the fragment in an editor and block until it exits
    #[instrument(skip(self, fragment), fields(path = %fragment.path.display()))]
    pub fn edit(&self, fragment: &Fragment, mode: &EditorMode) -> Result<EditOutcome> {
        let EditorMode::Command(command) = mode else {
            return Ok(EditOutcome::Manual);
        };

        let mut words = command.split_whitespace();
        let Some(program) = words.next() else {
            return Ok(EditOutcome::Manual);
        };

        debug!(editor = %command, "launching editor");
        let status = Command::new(program)
            .args(words)
            .arg(&fragment.path)
            .status()
            .map_err(|source| FragmentError::EditorLaunch {
                editor: command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(FragmentError::EditorFailed {
                editor: command.clone(),
                code: status.code(),
            }
            .into());
        }

        debug!("editor exited");
        Ok(EditOutcome::Edited)
    }
}

/// Check a title can be embedded in a fragment file name
pub fn validate_title(title: &str) -> Result<()> {
    let reason = if title.trim().is_empty() {
        Some("title cannot be empty")
    } else if title.contains(['/', '\\']) || Path::new(title).components().count() != 1 {
        Some("title cannot contain path separators")
    } else if title.starts_with('.') {
        Some("title cannot start with '.'")
    } else if title.chars().any(char::is_control) {
        Some("title cannot contain control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(FragmentError::InvalidTitle {
            title: title.to_string(),
            reason: reason.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

/// Random lowercase hex suffix taken from a v4 UUID
pub fn generate_suffix() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[hex.len() - SUFFIX_LEN..].to_string()
}
