//! calgrid configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult};
use crate::id::IdScheme;
use crate::view::ViewMode;

static DEFAULT_DATA_DIR: &str = "~/.local/share/calgrid";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

/// Configuration at ~/.config/calgrid/config.toml
///
/// Every key can be overridden from the environment with a `CALGRID_` prefix,
/// e.g. `CALGRID_DEFAULT_VIEW=week`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalGridConfig {
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub default_view: ViewMode,

    #[serde(default)]
    pub id_scheme: IdScheme,
}

impl Default for CalGridConfig {
    fn default() -> Self {
        CalGridConfig {
            data_dir: default_data_dir(),
            default_view: ViewMode::default(),
            id_scheme: IdScheme::default(),
        }
    }
}

impl CalGridConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented default file on first run.
    pub fn load() -> CalGridResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load config from `path` (which may be missing) plus `CALGRID_*`
    /// environment overrides.
    pub fn load_from(path: &Path) -> CalGridResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CALGRID"))
            .build()
            .map_err(|e| CalGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalGridError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Save the config to `path`.
    pub fn save(&self, path: &Path) -> CalGridResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalGridError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalGridResult<()> {
        let contents = format!(
            "\
# calgrid configuration

# Where events are stored:
# data_dir = \"{}\"

# View shown by `calgrid show` (day, week or month):
# default_view = \"month\"

# Id format for new events (uuid or timestamp):
# id_scheme = \"uuid\"
",
            DEFAULT_DATA_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalGridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalGridConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, CalGridConfig::default());
    }

    #[test]
    fn commented_default_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calgrid").join("config.toml");

        CalGridConfig::create_default_config(&path).unwrap();
        assert!(path.exists());

        let config = CalGridConfig::load_from(&path).unwrap();
        assert_eq!(config.default_view, ViewMode::Month);
        assert_eq!(config.id_scheme, IdScheme::Uuid);
    }

    #[test]
    fn reads_values_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/var/lib/calgrid\"\ndefault_view = \"week\"\nid_scheme = \"timestamp\"\n",
        )
        .unwrap();

        let config = CalGridConfig::load_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/var/lib/calgrid"));
        assert_eq!(config.default_view, ViewMode::Week);
        assert_eq!(config.id_scheme, IdScheme::Timestamp);
    }

    #[test]
    fn unknown_view_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_view = \"year\"\n").unwrap();

        assert!(matches!(
            CalGridConfig::load_from(&path),
            Err(CalGridError::Config(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = CalGridConfig {
            default_view: ViewMode::Day,
            ..CalGridConfig::default()
        };

        config.save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("data_dir"));
        assert_eq!(CalGridConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn data_path_expands_tilde() {
        let config = CalGridConfig::default();
        if let Some(home) = dirs::home_dir() {
            assert!(config.data_path().starts_with(home));
        }
    }
}
