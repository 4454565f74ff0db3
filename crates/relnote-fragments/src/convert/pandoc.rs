//! Pandoc-backed converter

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use relnote_core::{ConvertError, Dialect, Result};
use tracing::{debug, instrument};

use super::MarkupConverter;

/// Converts markup by piping it through the `pandoc` executable
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
}

impl PandocConverter {
    /// Use the given pandoc executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use an explicit executable if given, otherwise look `pandoc` up on `PATH`
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if path.is_file() => Ok(Self::new(path)),
            Some(path) => Err(ConvertError::ToolNotFound(path.display().to_string()).into()),
            None => which::which("pandoc")
                .map(Self::new)
                .map_err(|_| ConvertError::ToolNotFound("pandoc".to_string()).into()),
        }
    }

    /// Path of the executable
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn args(from: Dialect, to: Dialect) -> [&'static str; 4] {
        ["--from", from.as_str(), "--to", to.as_str()]
    }

    fn spawn_error(&self, source: std::io::Error) -> ConvertError {
        ConvertError::Spawn {
            tool: self.program.display().to_string(),
            source,
        }
    }
}

impl MarkupConverter for PandocConverter {
    fn name(&self) -> &'static str {
        "pandoc"
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    fn convert(&self, text: &str, from: Dialect, to: Dialect) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(Self::args(from, to))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stdin = child.stdin.take().ok_or_else(|| ConvertError::Failed {
            backend: self.name().to_string(),
            message: "stdin was not captured".to_string(),
        })?;

        // Feed stdin from another thread so a large document cannot fill the
        // stdout pipe while we are still writing.
        let input = text.to_string();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        let written = writer.join();

        if !output.status.success() {
            return Err(ConvertError::Failed {
                backend: self.name().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        match written {
            Ok(result) => result.map_err(|e| self.spawn_error(e))?,
            Err(_) => {
                return Err(ConvertError::Failed {
                    backend: self.name().to_string(),
                    message: "stdin writer panicked".to_string(),
                }
                .into())
            }
        }

        let converted = String::from_utf8(output.stdout)
            .map_err(|_| ConvertError::InvalidOutput(self.name().to_string()))?;
        debug!(output_len = converted.len(), "pandoc conversion finished");
        Ok(converted)
    }
}
