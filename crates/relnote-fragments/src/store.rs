//! Staging directory access

use std::path::{Path, PathBuf};

use relnote_core::config::Config;
use relnote_core::{FragmentError, Result};
use tracing::{debug, info, warn};

use crate::types::Fragment;

/// The staging directory, treated as a queue of pending fragments
#[derive(Debug, Clone)]
pub struct FragmentStore {
    dir: PathBuf,
    extension: String,
}

impl FragmentStore {
    /// Create a store over a directory holding `*.<extension>` fragments
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Create a store from configuration, resolving against a project root
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self::new(config.staging_path(root), config.extension.clone())
    }

    /// The staging directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fragment file extension
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Create the staging directory if it does not exist
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| FragmentError::Write {
            path: self.dir.clone(),
            source,
        })?;
        Ok(())
    }

    /// Scan the staging directory for pending fragments, sorted by file name.
    ///
    /// A missing staging directory means nothing is pending.
    pub fn pending(&self) -> Result<Vec<Fragment>> {
        if !self.dir.exists() {
            info!(dir = %self.dir.display(), "staging directory does not exist");
            return Ok(Vec::new());
        }

        let read_error = |source| FragmentError::Read {
            path: self.dir.clone(),
            source,
        };

        let mut fragments = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(read_error)? {
            let entry = entry.map_err(read_error)?;
            let path = entry.path();

            if !self.is_fragment_path(&path) {
                warn!(path = %path.display(), "skipping non-fragment entry in staging directory");
                continue;
            }

            match Fragment::from_path(&path) {
                Some(fragment) => fragments.push(fragment),
                None => warn!(path = %path.display(), "skipping fragment with non UTF-8 name"),
            }
        }

        fragments.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        debug!(count = fragments.len(), dir = %self.dir.display(), "pending fragments listed");
        Ok(fragments)
    }

    fn is_fragment_path(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| n.starts_with('.'));
        path.is_file()
            && !hidden
            && path
                .extension()
                .is_some_and(|e| e == self.extension.as_str())
    }

    /// Read a fragment's text
    pub fn read(&self, fragment: &Fragment) -> Result<String> {
        let text = std::fs::read_to_string(&fragment.path).map_err(|source| FragmentError::Read {
            path: fragment.path.clone(),
            source,
        })?;
        Ok(text)
    }

    /// Delete a fragment
    pub fn remove(&self, fragment: &Fragment) -> Result<()> {
        std::fs::remove_file(&fragment.path).map_err(|source| FragmentError::Remove {
            path: fragment.path.clone(),
            source,
        })?;
        debug!(path = %fragment.path.display(), "fragment removed");
        Ok(())
    }
}
