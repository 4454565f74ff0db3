//! New fragment command

use clap::Args;
use console::style;
use tracing::info;

use relnote_fragments::{EditOutcome, EditorMode, FragmentCreator, FragmentStore};

use crate::cli::output::{self, display_path};
use crate::cli::{Cli, OutputFormat, Project};

/// Create a new release-note fragment
#[derive(Debug, Args)]
pub struct NewCommand {
    /// Short title, used as the start of the fragment file name
    pub title: String,

    /// Editor command to open the fragment with (overrides config and $EDITOR)
    #[arg(long, value_name = "COMMAND")]
    pub editor: Option<String>,

    /// Do not open an editor, just create the file
    #[arg(long, conflicts_with = "editor")]
    pub no_edit: bool,
}

impl NewCommand {
    /// Execute the new command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(title = %self.title, no_edit = self.no_edit, "executing new command");
        let project = Project::load()?;

        let creator = FragmentCreator::new(FragmentStore::from_config(&project.config, &project.root));
        let fragment = creator.create(&self.title)?;
        let shown = display_path(&fragment.path, &project.cwd);

        let mode = if self.no_edit {
            EditorMode::Manual
        } else {
            EditorMode::resolve(self.editor.as_deref(), project.config.editor.as_deref())
        };

        let text = cli.format == OutputFormat::Text && !cli.quiet;
        if text {
            output::success(&format!(
                "Created {}",
                output::path_style().apply_to(&shown)
            ));
        }

        let outcome = creator.edit(&fragment, &mode)?;

        match cli.format {
            OutputFormat::Json => {
                let result = serde_json::json!({
                    "path": fragment.path.to_string_lossy(),
                    "title": self.title,
                    "edited": outcome == EditOutcome::Edited,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            OutputFormat::Text if !cli.quiet => {
                if outcome == EditOutcome::Manual {
                    output::info(&format!("Please edit {} manually", shown));
                }
                println!(
                    "When you are done editing don't forget to run {}",
                    style("relnote done").cyan()
                );
            }
            OutputFormat::Text => {}
        }

        Ok(())
    }
}
