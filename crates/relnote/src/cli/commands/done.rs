//! Done command - compile pending fragments

use clap::Args;
use console::style;
use tracing::info;

use relnote_core::{FailurePolicy, FragmentError, RelnoteError};
use relnote_fragments::{CompileReport, FragmentCompiler};

use crate::cli::output::{self, display_path};
use crate::cli::{Cli, OutputFormat, Project};

/// Compile pending fragments into release notes
#[derive(Debug, Args)]
pub struct DoneCommand {
    /// Print the note records that would be written, change nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Keep compiling the remaining fragments when one fails
    #[arg(long)]
    pub keep_going: bool,
}

impl DoneCommand {
    /// Execute the done command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(dry_run = self.dry_run, keep_going = self.keep_going, "executing done command");
        let project = Project::load()?;
        self.run(cli, &project)
    }

    fn run(&self, cli: &Cli, project: &Project) -> anyhow::Result<()> {
        let mut compiler = FragmentCompiler::from_config(&project.config, &project.root)?;
        if self.keep_going {
            compiler = compiler.with_policy(FailurePolicy::Continue);
        }

        if self.dry_run {
            return self.preview(cli, project, &compiler);
        }

        let report = compiler.compile_all()?;
        self.print_report(cli, project, &compiler, &report)?;

        if !report.is_success() {
            return Err(RelnoteError::from(FragmentError::BatchFailed {
                failed: report.failed.len(),
                total: report.total(),
            })
            .into());
        }

        Ok(())
    }

    fn preview(
        &self,
        cli: &Cli,
        project: &Project,
        compiler: &FragmentCompiler,
    ) -> anyhow::Result<()> {
        let previews = compiler.preview_all()?;

        match cli.format {
            OutputFormat::Json => {
                let items: Vec<_> = previews
                    .iter()
                    .map(|(fragment, record)| {
                        serde_json::json!({
                            "fragment": fragment.path.to_string_lossy(),
                            "output": compiler.note_path(fragment).to_string_lossy(),
                            "record": record,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            }
            OutputFormat::Text => {
                if previews.is_empty() {
                    output::info("No pending fragments");
                }
                for (fragment, record) in &previews {
                    println!(
                        "{} {} {}",
                        output::header(&display_path(&fragment.path, &project.cwd)),
                        style("→").dim(),
                        output::path_style()
                            .apply_to(display_path(&compiler.note_path(fragment), &project.cwd))
                    );
                    print!("{}", record.to_yaml()?);
                    println!();
                }
            }
        }

        Ok(())
    }

    fn print_report(
        &self,
        cli: &Cli,
        project: &Project,
        compiler: &FragmentCompiler,
        report: &CompileReport,
    ) -> anyhow::Result<()> {
        match cli.format {
            OutputFormat::Json => {
                let result = serde_json::json!({
                    "config": project.config_path,
                    "converter": compiler.converter_name(),
                    "compiled": report.compiled.iter().map(|note| serde_json::json!({
                        "fragment": note.fragment.path.to_string_lossy(),
                        "output": note.output.to_string_lossy(),
                        "sections": note.sections,
                    })).collect::<Vec<_>>(),
                    "failed": report.failed.iter().map(|failed| serde_json::json!({
                        "fragment": failed.fragment.path.to_string_lossy(),
                        "error": failed.error,
                    })).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            OutputFormat::Text => {
                if report.total() == 0 && !cli.quiet {
                    output::info(&format!(
                        "No pending fragments in {}",
                        display_path(compiler.store().dir(), &project.cwd)
                    ));
                }

                for note in &report.compiled {
                    if note.sections == 0 && !cli.quiet {
                        output::warning(&format!(
                            "{} had no sections",
                            display_path(&note.fragment.path, &project.cwd)
                        ));
                    }
                    if !cli.quiet {
                        output::success(&format!(
                            "{} {} {}",
                            display_path(&note.fragment.path, &project.cwd),
                            style("→").dim(),
                            output::path_style().apply_to(display_path(&note.output, &project.cwd))
                        ));
                    }
                }

                for failed in &report.failed {
                    output::error(&format!(
                        "{}: {}",
                        display_path(&failed.fragment.path, &project.cwd),
                        failed.error
                    ));
                }
            }
        }

        Ok(())
    }
}
