//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "relnote.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "relnote.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".relnote.yaml";

/// Extension of compiled note records
pub const NOTE_EXTENSION: &str = "yaml";

/// Number of hex characters in a fragment's random suffix
pub const SUFFIX_LEN: usize = 16;

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".relnote.toml",
    ]
}

/// Default configuration as commented YAML
pub fn default_config_yaml() -> String {
    DEFAULT_CONFIG_TEMPLATE.to_string()
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r##"# relnote configuration

# Pending fragments live here until `relnote done` compiles them
staging_dir: .changelog

# Compiled note records are written here
notes_dir: releasenotes/notes

extension: md
heading_marker: "# "

# editor: "code --wait"

# abort | continue
on_error: abort

convert:
  # auto | pandoc | native
  backend: auto
  from: markdown
  to: rst
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(config, Config::default());
    }
}
