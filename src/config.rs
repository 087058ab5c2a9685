//! Configuration loading
//!
//! Handles parsing of `todo.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::storage::MAX_FIELD_BYTES;
use crate::store::DEFAULT_DUE_DAYS;
use crate::task::{Category, DEFAULT_CATEGORIES};

pub const DEFAULT_CONFIG_FILE: &str = "todo.toml";
pub const MAX_DUE_IN_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Task file, relative to the working directory
    #[serde(default = "default_file")]
    pub file: PathBuf,

    /// Days between creating a task and its due date
    #[serde(default = "default_due_in_days")]
    pub due_in_days: i64,

    /// Category choices; the first is preselected
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: default_file(),
            due_in_days: default_due_in_days(),
            categories: default_categories(),
        }
    }
}

fn default_file() -> PathBuf {
    PathBuf::from("tasks.csv")
}

fn default_due_in_days() -> i64 {
    DEFAULT_DUE_DAYS
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or returns defaults when it is missing or invalid.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|content| Self::parse(&content))
        {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn category_options(&self) -> Vec<Category> {
        self.categories.iter().map(|c| Category::new(c.as_str())).collect()
    }

    fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::InvalidConfig(
                "categories cannot be empty".to_string(),
            ));
        }
        if let Some(bad) = self
            .categories
            .iter()
            .find(|c| {
                c.trim().is_empty()
                    || c.len() > MAX_FIELD_BYTES
                    || c.contains([',', '\n', '\r'])
            })
        {
            return Err(Error::InvalidConfig(format!(
                "invalid category name {bad:?}"
            )));
        }
        if !(0..=MAX_DUE_IN_DAYS).contains(&self.due_in_days) {
            return Err(Error::InvalidConfig(format!(
                "due_in_days must be between 0 and {MAX_DUE_IN_DAYS}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.file, PathBuf::from("tasks.csv"));
        assert_eq!(cfg.due_in_days, 7);
        assert_eq!(cfg.categories, ["Personal", "Work", "Study"]);
    }

    #[test]
    fn categories_can_be_extended() {
        let cfg = Config::parse(r#"categories = ["Personal", "Work", "Study", "Chores"]"#).unwrap();
        assert_eq!(cfg.category_options().len(), 4);
        assert_eq!(cfg.category_options()[3].as_str(), "Chores");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            Config::parse("categories = []"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::parse(r#"categories = ["a,b"]"#),
            Err(Error::InvalidConfig(_))
        ));
        let long = "c".repeat(MAX_FIELD_BYTES + 1);
        assert!(matches!(
            Config::parse(&format!("categories = [\"{long}\"]")),
            Err(Error::InvalidConfig(_))
        ));
        let max = "c".repeat(MAX_FIELD_BYTES);
        assert!(Config::parse(&format!("categories = [\"{max}\"]")).is_ok());
        assert!(matches!(
            Config::parse(r#"categories = ["Work\nLife"]"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::parse(r#"categories = ["Work\r"]"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::parse("due_in_days = -1"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::parse("due_in_days = 100000"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::parse("due_in_days = \"soon\""),
            Err(Error::TomlParse(_))
        ));
    }
}
