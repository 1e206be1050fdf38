//! Configuration loader.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Config, ConfigError, ConfigResult};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "clientpack.toml";

/// A loaded configuration together with the directory its paths resolve against.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory containing the configuration file, or the start directory
    /// when none was found.
    pub root: PathBuf,

    /// Effective configuration.
    pub config: Config,

    /// File the configuration was read from, if any.
    pub source: Option<PathBuf>,
}

impl Project {
    /// Resolves a configured path against the project root.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

/// Loads configuration from the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    debug!(?path, "loading configuration");

    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config =
        toml::from_str(&content).map_err(|source| ConfigError::InvalidToml {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&config)?;

    Ok(config)
}

/// Finds the configuration file starting from the given directory.
///
/// Walks up the directory tree until a configuration file is found.
#[must_use]
pub fn find_config_from(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut dir = start_dir.as_ref();

    loop {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        dir = dir.parent()?;
    }
}

/// Loads the project configuration.
///
/// With an explicit path the file must exist. Otherwise the configuration is
/// searched upwards from `start_dir`; when nothing is found the built-in
/// defaults apply and `start_dir` becomes the project root.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be read or parsed.
pub fn load_project(explicit: Option<&Path>, start_dir: impl AsRef<Path>) -> ConfigResult<Project> {
    let start_dir = start_dir.as_ref();

    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_from(start_dir),
    };

    let Some(source) = source else {
        debug!(root = ?start_dir, "no configuration file found, using defaults");
        return Ok(Project {
            root: start_dir.to_path_buf(),
            config: Config::default(),
            source: None,
        });
    };

    let config = load_config(&source)?;
    let root = source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);

    Ok(Project {
        root,
        config,
        source: Some(source),
    })
}

fn validate(config: &Config) -> ConfigResult<()> {
    if config.product.name.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: "product.name",
            reason: "must not be empty",
        });
    }

    if config.manifest.include.is_empty() {
        return Err(ConfigError::Invalid {
            field: "manifest.include",
            reason: "must list at least one directory",
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_name() {
        assert_eq!(CONFIG_FILE_NAME, "clientpack.toml");
    }

    #[test]
    fn test_load_config_not_found() {
        let result = load_config("/nonexistent/path/clientpack.toml");
        match result {
            Err(ConfigError::NotFound { path }) => {
                assert!(path.to_string_lossy().contains("clientpack.toml"));
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_load_config_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "").unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.product.name, "luker-otclient");
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::InvalidToml { .. })));
    }

    #[test]
    fn test_load_config_rejects_empty_include() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[manifest]\ninclude = []\n").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "manifest.include",
                ..
            })
        ));
    }

    #[test]
    fn test_load_config_rejects_blank_product_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[product]\nname = \"  \"\n").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "product.name",
                ..
            })
        ));
    }

    #[test]
    fn test_find_config_in_parent() {
        let parent_dir = TempDir::new().unwrap();
        let config_path = parent_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "").unwrap();

        let child_dir = parent_dir.path().join("bin").join("plugins");
        fs::create_dir_all(&child_dir).unwrap();

        assert_eq!(find_config_from(&child_dir), Some(config_path));
    }

    #[test]
    fn test_load_project_without_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let project = load_project(None, temp_dir.path()).unwrap();
        assert_eq!(project.root, temp_dir.path());
        assert!(project.source.is_none());
        assert_eq!(project.config.product.name, "luker-otclient");
    }

    #[test]
    fn test_load_project_root_is_config_dir() {
        let parent_dir = TempDir::new().unwrap();
        fs::write(
            parent_dir.path().join(CONFIG_FILE_NAME),
            r#"
            [product]
            name = "mygame"
        "#,
        )
        .unwrap();

        let child_dir = parent_dir.path().join("data");
        fs::create_dir(&child_dir).unwrap();

        let project = load_project(None, &child_dir).unwrap();
        assert_eq!(project.root, parent_dir.path());
        assert_eq!(project.config.product.name, "mygame");
        assert_eq!(
            project.resolve("updater/version.txt"),
            parent_dir.path().join("updater/version.txt")
        );
    }

    #[test]
    fn test_load_project_explicit_missing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("other.toml");

        let result = load_project(Some(&missing), temp_dir.path());
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }
}
