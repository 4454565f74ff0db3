//! Shell completions generation command

use std::io;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::Cli;

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = %self.shell, "executing completions command");
        let mut cmd = Cli::command();

        match &self.output {
            Some(path) => {
                let mut file = std::fs::File::create(path)?;
                generate(self.shell, &mut cmd, "relnote", &mut file);
                if !cli.quiet {
                    println!("Completions written to {}", path.display());
                }
            }
            None => generate(self.shell, &mut cmd, "relnote", &mut io::stdout()),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_bash_completions() {
        let mut buf = Vec::new();
        generate(Shell::Bash, &mut Cli::command(), "relnote", &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("relnote"));
        assert!(script.contains("done"));
    }
}
