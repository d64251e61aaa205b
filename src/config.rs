//! User configuration, read from `config.toml`.
//!
//! ```toml
//! # keep the last 100 computations
//! history_capacity = 100
//! store_path = "/home/me/.local/share/deskcalc/store.json"
//! ```

use crate::error::{Error, Result};
use crate::history::DEFAULT_CAPACITY;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings read from `config.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum number of history entries kept
    pub history_capacity: usize,
    /// Location of the store file; the platform data directory when unset
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            store_path: None,
        }
    }
}

impl Config {
    /// `deskcalc/config.toml` in the user configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deskcalc").join("config.toml"))
    }

    /// Load the file at `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "loading configuration");
                Self::from_toml(&text)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(Error::Config(format!("{}: {}", path.display(), err))),
        }
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(Error::Config("history_capacity must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert_eq!(Config::default().history_capacity, 50);
    }

    #[test]
    fn values() {
        let config = Config::from_toml(
            r#"
            history_capacity = 10
            store_path = "/tmp/calc.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/calc.json")));
    }

    #[test]
    fn rejected() {
        assert!(matches!(
            Config::from_toml("history_capacity = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("colour = \"blue\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("history_capacity = \"many\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Config::load(&dir.path().join("config.toml")).unwrap(),
            Config::default()
        );

        let path = dir.path().join("custom.toml");
        fs::write(&path, "history_capacity = 3").unwrap();
        assert_eq!(Config::load(&path).unwrap().history_capacity, 3);
    }
}
