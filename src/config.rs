//! Configuration management module.
//!
//! Settings come from an optional JSON file in the working directory.
//! Missing keys fall back to defaults; a missing file means all defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::theme::ThemeMode;

pub const CONFIG_FILE_NAME: &str = "simple-bank.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default)]
    pub theme: ThemeMode,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("banking.db")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("banking.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_file: default_log_file(),
            theme: ThemeMode::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Apply command-line overrides: `simple-bank [DB_PATH]`
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(db_path) = args.into_iter().map(Into::into).find(|a| !a.is_empty()) {
            self.database_path = PathBuf::from(db_path);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database_path, PathBuf::from("banking.db"));
        assert_eq!(config.log_file, PathBuf::from("banking.log"));
        assert_eq!(config.theme, ThemeMode::Light);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "theme": "dark" }"#).unwrap();
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.database_path, PathBuf::from("banking.db"));
    }

    #[test]
    fn test_full_json() {
        let config = Config::from_json(
            r#"{ "database_path": "/tmp/bank.db", "log_file": "/tmp/bank.log", "theme": "light" }"#,
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/bank.db"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/bank.log"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Config::from_json("{ not json").is_err());
        assert!(Config::from_json(r#"{ "theme": "sepia" }"#).is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/simple-bank.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_args_override_database_path() {
        let config = Config::default().with_args(["other.db"]);
        assert_eq!(config.database_path, PathBuf::from("other.db"));

        let untouched = Config::default().with_args(Vec::<String>::new());
        assert_eq!(untouched.database_path, PathBuf::from("banking.db"));
    }
}
