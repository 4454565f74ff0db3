//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::info;

use relnote_core::config::defaults::{default_config_yaml, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML};
use relnote_core::config::Config;

use crate::cli::{output, Cli};

/// Write a default relnote configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Never prompt; fail instead of asking to overwrite
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Write TOML instead of YAML
    #[arg(long)]
    pub toml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;
        let default_name = if self.toml {
            DEFAULT_CONFIG_TOML
        } else {
            DEFAULT_CONFIG_YAML
        };
        let config_path = self.output.clone().unwrap_or_else(|| cwd.join(default_name));

        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        std::fs::write(&config_path, self.render()?)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
            println!();
            println!("Next steps:");
            println!("  1. Run {} to start a fragment", style("relnote new <title>").cyan());
            println!(
                "  2. Run {} to compile fragments into release notes",
                style("relnote done").cyan()
            );
        }

        Ok(())
    }

    fn render(&self) -> anyhow::Result<String> {
        if self.toml {
            Ok(toml::to_string_pretty(&Config::default())?)
        } else {
            Ok(default_config_yaml())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(toml: bool) -> InitCommand {
        InitCommand {
            force: false,
            yes: true,
            toml,
            output: None,
        }
    }

    #[test]
    fn test_rendered_configs_parse_to_defaults() {
        let yaml = command(false).render().unwrap();
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, Config::default());

        let toml_text = command(true).render().unwrap();
        let config: Config = toml::from_str(&toml_text).unwrap();
        assert_eq!(config, Config::default());
    }
}
