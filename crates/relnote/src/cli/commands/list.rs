//! List pending fragments

use clap::Args;
use console::style;
use tracing::info;

use relnote_fragments::{FragmentParser, FragmentStore};

use crate::cli::output::{self, display_path};
use crate::cli::{Cli, OutputFormat, Project};

/// List pending fragments
#[derive(Debug, Args)]
pub struct ListCommand {}

impl ListCommand {
    /// Execute the list command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing list command");
        let project = Project::load()?;
        let store = FragmentStore::from_config(&project.config, &project.root);
        let parser = FragmentParser::new(project.config.heading_marker.clone());

        let mut entries = Vec::new();
        for fragment in store.pending()? {
            let parsed = parser.parse(&store.read(&fragment)?);
            let sections: Vec<String> = parsed.names().into_iter().map(String::from).collect();
            entries.push((fragment, sections));
        }

        match cli.format {
            OutputFormat::Json => {
                let items: Vec<_> = entries
                    .iter()
                    .map(|(fragment, sections)| {
                        serde_json::json!({
                            "path": fragment.path.to_string_lossy(),
                            "title": fragment.title(),
                            "sections": sections,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            }
            OutputFormat::Text => {
                if entries.is_empty() {
                    if !cli.quiet {
                        output::info("No pending fragments");
                    }
                    return Ok(());
                }

                println!(
                    "{}",
                    output::header(&format!("Pending fragments ({})", entries.len()))
                );
                for (fragment, sections) in &entries {
                    let sections = if sections.is_empty() {
                        style("no sections").yellow().to_string()
                    } else {
                        sections.join(", ")
                    };
                    println!(
                        "  {}  {}",
                        output::path_style().apply_to(display_path(&fragment.path, &project.cwd)),
                        sections
                    );
                }
            }
        }

        Ok(())
    }
}
