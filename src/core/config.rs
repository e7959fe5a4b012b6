//! Persistent user settings.
//!
//! Stored as pretty-printed JSON in `<config dir>/svn-navigator/config.json` and
//! created with defaults on first start. Command-line flags are layered on top by
//! [`Config::with_overrides`]; nothing from the command line is written back, so a
//! password never ends up on disk.

use crate::core::dirs::get_config_directory;
use crate::core::error::Result;
use crate::core::model::DEFAULT_LOG_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub svn_binary: String,
    pub username: Option<String>,
    pub log_page_size: u32,
    pub hide_unversioned: bool,
    pub check_up_to_date: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            svn_binary: "svn".to_string(),
            username: None,
            log_page_size: DEFAULT_LOG_LIMIT,
            hide_unversioned: true,
            check_up_to_date: true,
        }
    }
}

impl Config {
    pub fn load_or_create() -> Result<Self> {
        let config_dir = get_config_directory()?;
        Self::load_or_create_in(&config_dir)
    }

    pub fn load_or_create_in(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join("config.json");

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)?;
            let config: Self = serde_json::from_str(&content)?;
            log::debug!("Loaded config from {}", config_file.display());
            Ok(config.sanitized())
        } else {
            let config = Self::default();
            config.save_in(config_dir)?;
            log::info!("Created default config at {}", config_file.display());
            Ok(config)
        }
    }

    pub fn save_in(&self, config_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(config_dir)?;

        let config_file = config_dir.join("config.json");
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_file, content)?;

        Ok(())
    }

    /// Apply command-line flags; `None` keeps the configured value
    pub fn with_overrides(mut self, svn_binary: Option<String>, username: Option<String>) -> Self {
        if let Some(binary) = svn_binary {
            self.svn_binary = binary;
        }
        if username.is_some() {
            self.username = username;
        }
        self
    }

    fn sanitized(mut self) -> Self {
        if self.log_page_size == 0 {
            log::warn!("log_page_size must be positive, using {DEFAULT_LOG_LIMIT}");
            self.log_page_size = DEFAULT_LOG_LIMIT;
        }
        if self.svn_binary.trim().is_empty() {
            self.svn_binary = Config::default().svn_binary;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_create_in(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.json").exists());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{ "username": "alice", "log_page_size": 0 }"#,
        )
        .unwrap();

        let config = Config::load_or_create_in(dir.path()).unwrap();
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.log_page_size, DEFAULT_LOG_LIMIT);
        assert_eq!(config.svn_binary, "svn");
        assert!(config.hide_unversioned);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();
        assert!(Config::load_or_create_in(dir.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(Some("/opt/svn/bin/svn".into()), None)
            .with_overrides(None, Some("bob".into()));
        assert_eq!(config.svn_binary, "/opt/svn/bin/svn");
        assert_eq!(config.username.as_deref(), Some("bob"));
    }
}
