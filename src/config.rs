//! Configuration loading and management
//!
//! Handles parsing of `taskman.toml` files in the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store file names
    #[serde(default)]
    pub store: StoreConfig,

    /// Report file names
    #[serde(default)]
    pub reports: ReportsConfig,
}

/// Store-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// File holding `username;password` records
    #[serde(default = "default_users_file")]
    pub users_file: String,

    /// File holding task records
    #[serde(default = "default_tasks_file")]
    pub tasks_file: String,
}

fn default_users_file() -> String {
    "user.txt".to_string()
}

fn default_tasks_file() -> String {
    "tasks.txt".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            users_file: default_users_file(),
            tasks_file: default_tasks_file(),
        }
    }
}

/// Report-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Output file for the task overview report
    #[serde(default = "default_task_overview_file")]
    pub task_overview_file: String,

    /// Output file for the user overview report
    #[serde(default = "default_user_overview_file")]
    pub user_overview_file: String,
}

fn default_task_overview_file() -> String {
    "task_overview.txt".to_string()
}

fn default_user_overview_file() -> String {
    "user_overview.txt".to_string()
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            task_overview_file: default_task_overview_file(),
            user_overview_file: default_user_overview_file(),
        }
    }
}

impl Config {
    /// Load configuration from a `taskman.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join("taskman.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        validate_file_name(&self.store.users_file, "store.users_file")?;
        validate_file_name(&self.store.tasks_file, "store.tasks_file")?;
        validate_file_name(&self.reports.task_overview_file, "reports.task_overview_file")?;
        validate_file_name(&self.reports.user_overview_file, "reports.user_overview_file")?;
        if self.store.users_file == self.store.tasks_file {
            return Err(crate::error::Error::InvalidConfig(
                "store.users_file and store.tasks_file must differ".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_file_name(name: &str, field: &str) -> crate::error::Result<()> {
    if name.trim().is_empty() {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field}: file name cannot be empty"
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field}: file name cannot contain path separators"
        )));
    }
    Ok(())
}
