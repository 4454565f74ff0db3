//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relnote_core::config::{load_config_or_default, project_root, Config};

use commands::{CompletionsCommand, DoneCommand, InitCommand, ListCommand, NewCommand};

/// relnote - Release-note fragments for humans, note records for release tooling
#[derive(Debug, Parser)]
#[command(name = "relnote")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new release-note fragment
    New(NewCommand),

    /// Compile pending fragments into release notes
    Done(DoneCommand),

    /// List pending fragments
    List(ListCommand),

    /// Write a default relnote configuration
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match &self.command {
            Commands::New(cmd) => cmd.execute(self),
            Commands::Done(cmd) => cmd.execute(self),
            Commands::List(cmd) => cmd.execute(self),
            Commands::Init(cmd) => cmd.execute(self),
            Commands::Completions(cmd) => cmd.execute(self),
        }
    }
}

/// Loaded configuration plus the directories it is resolved against
#[derive(Debug, Clone)]
pub struct Project {
    /// Effective configuration
    pub config: Config,
    /// Config file in use, if any
    pub config_path: Option<PathBuf>,
    /// Directory relative config paths resolve against
    pub root: PathBuf,
    /// Working directory, for display
    pub cwd: PathBuf,
}

impl Project {
    /// Load the project for the current working directory
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load the project as seen from `cwd`
    pub fn load_from(cwd: PathBuf) -> anyhow::Result<Self> {
        let (config, config_path) = load_config_or_default(&cwd)?;
        let root = project_root(&cwd, config_path.as_deref());
        Ok(Self {
            config,
            config_path,
            root,
            cwd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new() {
        let cli = Cli::try_parse_from(["relnote", "new", "fix-login", "--no-edit"]).unwrap();
        match cli.command {
            Commands::New(cmd) => {
                assert_eq!(cmd.title, "fix-login");
                assert!(cmd.no_edit);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_done_flags() {
        let cli =
            Cli::try_parse_from(["relnote", "--format", "json", "done", "--dry-run", "--keep-going"])
                .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Done(cmd) => {
                assert!(cmd.dry_run);
                assert!(cmd.keep_going);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_new_requires_title() {
        assert!(Cli::try_parse_from(["relnote", "new"]).is_err());
    }

    #[test]
    fn test_editor_conflicts_with_no_edit() {
        assert!(
            Cli::try_parse_from(["relnote", "new", "x", "--editor", "vim", "--no-edit"]).is_err()
        );
    }
}
