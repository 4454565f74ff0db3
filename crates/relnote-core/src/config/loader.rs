//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, RelnoteError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// The first name from [`config_file_names`] that exists wins at each level.
/// Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration, or use defaults when no config file exists.
///
/// A config file that exists but fails to parse or validate is still an error.
pub fn load_config_or_default(dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    match load_config_from_dir(dir) {
        Ok((config, path)) => Ok((config, Some(path))),
        Err(RelnoteError::Config(ConfigError::NotFound(_))) => {
            debug!(dir = %dir.display(), "no config found, using defaults");
            Ok((Config::default(), None))
        }
        Err(err) => Err(err),
    }
}

/// Directory relative config paths resolve against
pub fn project_root(cwd: &Path, config_path: Option<&Path>) -> PathBuf {
    config_path
        .and_then(|p| p.parent())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConverterBackend;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("relnote.yaml");
        std::fs::write(&config_path, "notes_dir: notes\n").unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_yaml_over_toml() {
        let temp = TempDir::new().unwrap();
        let yaml_path = temp.path().join("relnote.yaml");
        let toml_path = temp.path().join("relnote.toml");
        std::fs::write(&yaml_path, "notes_dir: notes\n").unwrap();
        std::fs::write(&toml_path, "notes_dir = \"other\"\n").unwrap();

        let found = find_config(temp.path()).unwrap();
        assert_eq!(found, yaml_path);
    }

    #[test]
    fn test_find_config_in_parent() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(".relnote.toml");
        std::fs::write(&config_path, "extension = \"md\"\n").unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), Some(config_path));
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("relnote.toml");
        std::fs::write(
            &config_path,
            "staging_dir = \"pending\"\n\n[convert]\nbackend = \"native\"\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.staging_dir, PathBuf::from("pending"));
        assert_eq!(config.convert.backend, ConverterBackend::Native);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("relnote.yaml");
        std::fs::write(&config_path, "heading_marker: \"\"\n").unwrap();

        let err = load_config(&config_path).unwrap_err();
        assert!(matches!(
            err,
            RelnoteError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_config_from_dir_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load_config_from_dir(temp.path()).unwrap_err();
        assert!(matches!(err, RelnoteError::Config(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_config_from_dir_walks_up() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("relnote.yaml");
        std::fs::write(&config_path, "extension: txt\n").unwrap();
        let nested = temp.path().join("docs");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = load_config_from_dir(&nested).unwrap();
        assert_eq!(path, config_path);
        assert_eq!(config.extension, "txt");
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let (config, path) = load_config_or_default(temp.path()).unwrap();
        assert!(path.is_none());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_surfaces_parse_errors() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("relnote.yaml"), "on_error: [nope\n").unwrap();
        assert!(load_config_or_default(temp.path()).is_err());
    }

    #[test]
    fn test_project_root() {
        let cwd = Path::new("/repo/sub");
        assert_eq!(project_root(cwd, None), PathBuf::from("/repo/sub"));
        assert_eq!(
            project_root(cwd, Some(Path::new("/repo/relnote.yaml"))),
            PathBuf::from("/repo")
        );
    }
}
