//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::export::ExportFormat;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Export settings
    pub export: ExportConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Format preselected in download controls
    pub default_format: ExportFormat,
    /// Directory the last export was saved to
    pub last_directory: Option<PathBuf>,
    /// Open exported files with the system handler
    pub open_after_export: bool,
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme (light/dark)
    pub theme: String,
    /// Sidebar width
    pub sidebar_width: f32,
    /// Show the folder and page hierarchy in the sidebar
    pub show_hierarchy: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Json,
            last_directory: None,
            open_after_export: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            sidebar_width: 250.0,
            show_hierarchy: true,
        }
    }
}

impl UiConfig {
    pub fn is_dark(&self) -> bool {
        self.theme != "light"
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "notefold", "Notefold")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from a file, defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the platform config directory
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Remember the directory of an export target
    pub fn remember_export_path(&mut self, file: &Path) {
        if let Some(parent) = file.parent() {
            self.export.last_directory = Some(parent.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.export.default_format = ExportFormat::Markdown;
        config.ui.theme = "light".to_string();
        config.remember_export_path(&dir.path().join("exports").join("a.md"));
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!loaded.ui.is_dark());
        assert_eq!(loaded.export.last_directory, Some(dir.path().join("exports")));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "export": { "default_format": "html" } }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.export.default_format, ExportFormat::Html);
        assert!(!config.export.open_after_export);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}
