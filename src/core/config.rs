//! Application configuration management

use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where original documents come from
    pub source: SourceConfig,
    /// Renderer settings
    pub renderer: RendererConfig,
}

/// Document source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory containing the markdown set
    pub root: Option<PathBuf>,
    /// Base URL serving the markdown set (takes precedence over `root`)
    pub base_url: Option<String>,
    /// Explicit filenames in display order; required for URL sources,
    /// optional for directory sources (which can scan)
    pub files: Vec<String>,
}

/// Renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Default rendering pipeline ("custom" or "library")
    pub variant: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: None,
            base_url: None,
            files: Vec::new(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            variant: "custom".to_string(),
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "docfolio", "Docfolio")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Get the overlay store path
    pub fn overlay_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("overlays.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.source.root.is_none());
        assert!(config.source.base_url.is_none());
        assert!(config.source.files.is_empty());
        assert_eq!(config.renderer.variant, "custom");
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut config = AppConfig::default();
        config.source.root = Some(PathBuf::from("/docs"));
        config.source.files = vec!["a.md".to_string()];
        config.renderer.variant = "library".to_string();

        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source.root, config.source.root);
        assert_eq!(back.source.files, config.source.files);
        assert_eq!(back.renderer.variant, "library");
    }
}
