//! Tool configuration.
//!
//! This module loads the settings of the shell and the engine from TOML files:
//! - The ordered extension table (one `[[categories]]` entry per category)
//! - The name of the trash bucket
//! - The viewer used while renaming, and whether to open it at all
//! - The ffprobe program used to read video durations
//!
//! # Configuration File Format
//!
//! Top-level keys must come before the first `[[categories]]` table:
//!
//! ```toml
//! trash_folder_name = "Trash"
//! open_while_renaming = true
//! viewer = ["vlc", "--play-and-exit"]
//! ffprobe = "ffprobe"
//!
//! [[categories]]
//! name = "Videos"
//! extensions = [".mp4", ".MOV"]
//!
//! [[categories]]
//! name = "Other"
//! extensions = []
//! ```
//!
//! When `categories` is omitted the built-in table is used.

use crate::file_category::{Category, ExtensionTable, default_categories, is_plain_name};
use crate::rename::ViewerCommand;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".videologrc.toml";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
    /// A category declaration is malformed.
    #[error("Invalid category '{category}': {reason}")]
    InvalidCategory { category: String, reason: String },
    /// Two categories share a label.
    #[error("Category '{0}' is declared more than once")]
    DuplicateCategory(String),
    /// An extension is claimed by more than one category.
    #[error("Extension '{extension}' in category '{category}' is already used by an earlier category")]
    DuplicateExtension { extension: String, category: String },
    /// The trash folder name cannot be used as a directory name.
    #[error("Invalid trash folder name '{0}': expected a single, non-empty directory name")]
    InvalidTrashName(String),
}

/// Settings shared by the shell and the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory that receives trashed videos and files.
    pub trash_folder_name: String,
    /// Whether `rename` opens each file in the viewer.
    pub open_while_renaming: bool,
    /// Viewer program followed by its arguments; the file path is appended.
    pub viewer: Vec<String>,
    /// Program used to probe video durations.
    pub ffprobe: String,
    /// Category declarations in priority order.
    pub categories: Vec<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trash_folder_name: "Trash".to_string(),
            open_while_renaming: true,
            viewer: vec!["vlc".to_string()],
            ffprobe: "ffprobe".to_string(),
            categories: default_categories(),
        }
    }
}

impl Config {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.videologrc.toml` in `start_dir`, the directory the shell opens in
    /// 3. Look for `~/.config/videolog/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is malformed.
    pub fn load(config_path: Option<&Path>, start_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = start_dir.join(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("videolog")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the validated extension table.
    pub fn extension_table(&self) -> Result<ExtensionTable, ConfigError> {
        ExtensionTable::new(self.categories.clone())
    }

    /// Checks the settings that the extension table does not cover.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.trash_folder_name.as_str();
        if name.trim().is_empty() || !is_plain_name(name) {
            return Err(ConfigError::InvalidTrashName(name.to_string()));
        }
        Ok(())
    }

    /// Returns the viewer to spawn while renaming, if renaming should open files.
    pub fn viewer_command(&self) -> Option<ViewerCommand> {
        if !self.open_while_renaming {
            return None;
        }
        let (program, args) = self.viewer.split_first()?;
        Some(ViewerCommand::new(program, args))
    }
}
