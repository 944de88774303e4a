//! Configuration management for puzzlelab
//!
//! Handles loading, saving, and default configuration values.
//! Config file location: ~/.config/puzzlelab/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeName,
    /// Where saved games are stored (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Where "share as file" writes games (defaults to the working dir)
    pub export_dir: Option<PathBuf>,
    /// Show the help pane on start-up
    pub docs_open: bool,
    /// How long the "copied!" share label stays up
    pub share_link_seconds: u64,
    pub links: Links,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeName::Gruvbox,
            data_dir: None,
            export_dir: None,
            docs_open: true,
            share_link_seconds: 3,
            links: Links::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("puzzlelab");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Directory for "share as file" exports
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// External pages linked from the menu bar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub gallery: String,
    pub repository: String,
}

impl Default for Links {
    fn default() -> Self {
        Self {
            gallery: "https://sprig.hackclub.com/gallery".into(),
            repository: "https://github.com/hackclub/sprig/".into(),
        }
    }
}

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Gruvbox,
    Nord,
    Transparent,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Gruvbox => "Gruvbox",
            ThemeName::Nord => "Nord",
            ThemeName::Transparent => "Transparent",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeName::Gruvbox => ThemeName::Nord,
            ThemeName::Nord => ThemeName::Transparent,
            ThemeName::Transparent => ThemeName::Gruvbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, ThemeName::Gruvbox);
        assert!(config.docs_open);
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("theme = \"nord\"\n[links]\ngallery = \"x\"\n").unwrap();
        assert_eq!(config.theme, ThemeName::Nord);
        assert_eq!(config.links.gallery, "x");
        assert_eq!(config.links.repository, Links::default().repository);
        assert_eq!(config.share_link_seconds, 3);
    }

    #[test]
    fn test_theme_cycle() {
        let theme = ThemeName::Gruvbox;
        assert_eq!(theme.next(), ThemeName::Nord);
        assert_eq!(theme.next().next(), ThemeName::Transparent);
        assert_eq!(theme.next().next().next(), ThemeName::Gruvbox);
    }
}
