//! Configuration loading and management
//!
//! Handles parsing of `.tasktrack.toml` in the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = ".tasktrack.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Account allowed to run administrative commands
    #[serde(default = "default_admin_user")]
    pub admin_user: String,

    /// chrono format for due dates typed on the command line
    #[serde(default = "default_date_input_format")]
    pub date_input_format: String,

    /// Backing store file names
    #[serde(default)]
    pub files: FilesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_user: default_admin_user(),
            date_input_format: default_date_input_format(),
            files: FilesConfig::default(),
        }
    }
}

fn default_admin_user() -> String {
    "admin".to_string()
}

fn default_date_input_format() -> String {
    "%d/%m/%Y".to_string()
}

/// File names of the four backing stores, relative to the data directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilesConfig {
    #[serde(default = "default_tasks_file")]
    pub tasks: String,

    #[serde(default = "default_users_file")]
    pub users: String,

    #[serde(default = "default_task_overview_file")]
    pub task_overview: String,

    #[serde(default = "default_user_overview_file")]
    pub user_overview: String,
}

fn default_tasks_file() -> String {
    "tasks.txt".to_string()
}

fn default_users_file() -> String {
    "user.txt".to_string()
}

fn default_task_overview_file() -> String {
    "task_overview.txt".to_string()
}

fn default_user_overview_file() -> String {
    "user_overview.txt".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            tasks: default_tasks_file(),
            users: default_users_file(),
            task_overview: default_task_overview_file(),
            user_overview: default_user_overview_file(),
        }
    }
}

impl Config {
    /// Load configuration from a `.tasktrack.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            match Self::load(&config_path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &PathBuf) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.admin_user.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "admin_user cannot be empty".to_string(),
            ));
        }
        if self.date_input_format.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "date_input_format cannot be empty".to_string(),
            ));
        }
        self.files.validate()
    }
}

impl FilesConfig {
    fn validate(&self) -> crate::error::Result<()> {
        let entries = [
            ("files.tasks", &self.tasks),
            ("files.users", &self.users),
            ("files.task_overview", &self.task_overview),
            ("files.user_overview", &self.user_overview),
        ];

        let mut seen = std::collections::HashSet::new();
        for (field, name) in entries {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "{field} cannot be empty"
                )));
            }
            if trimmed.contains('/') || trimmed.contains('\\') {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "{field} must be a plain file name, got '{trimmed}'"
                )));
            }
            if trimmed == CONFIG_FILE {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "{field} cannot reuse the config file name"
                )));
            }
            if !seen.insert(trimmed.to_string()) {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "{field} duplicates another store file '{trimmed}'"
                )));
            }
        }

        Ok(())
    }
}
