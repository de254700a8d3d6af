//! Application configuration module
//!
//! This module centralizes all application configuration settings using `confy`
//! for automatic serialization and OS-specific config directory management.

use crate::constant::{
    APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, DEFAULT_MATCHING_THRESHOLD,
    DEFAULT_MAX_COMPARISONS, DEFAULT_SET_ACTIVE_URL, MAX_RECENT_FILES, TOAST_TIMEOUT_MS,
};
use crate::diff::{DisplayMode, Granularity, OutputLayout, RendererConfig};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Config {
    pub settings: Settings,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = confy::load(APP_NAME, None)?;
        info!("Load config from {:?}", Self::config_path()?);
        Ok(Self { settings })
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, &self.settings)?;
        info!("Save config to {:?}", Self::config_path()?);
        Ok(())
    }

    /// Get the application data directory
    /// Falls back to a local "data" directory if platform dirs are unavailable
    pub fn data_dir(&self) -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME) {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from("data")
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    /// Add a version file to the recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.settings.push_recent_file(path);

        // Save changes in background since it's synchronous IO
        let settings = self.settings.clone();
        std::thread::spawn(move || {
            if let Err(e) = confy::store(APP_NAME, None, &settings) {
                tracing::error!("Failed to save recent files: {}", e);
            }
        });
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default settings: {}", e);
            Self {
                settings: Settings::default(),
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the admin panel backend
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// URL template for the "set version N as active" action,
    /// `VERSION_NUMBER` is replaced with the version number
    #[serde(default = "default_set_active_url")]
    pub set_active_url_template: String,

    /// Auto-dismiss delay for notifications in milliseconds
    #[serde(default = "default_toast_timeout")]
    pub toast_timeout_ms: u64,

    /// Recently opened version files, most recent first
    #[serde(default)]
    pub recent_files: Vec<PathBuf>,

    /// Diff presentation settings
    #[serde(default)]
    pub diff: DiffSettings,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_set_active_url() -> String {
    DEFAULT_SET_ACTIVE_URL.to_string()
}

fn default_toast_timeout() -> u64 {
    TOAST_TIMEOUT_MS
}

impl Settings {
    /// Move the path to the front, dropping duplicates and anything past the cap
    pub fn push_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(MAX_RECENT_FILES);
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            set_active_url_template: default_set_active_url(),
            toast_timeout_ms: default_toast_timeout(),
            recent_files: Vec::new(),
            diff: DiffSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffSettings {
    /// Segment view or unified-diff view
    #[serde(default)]
    pub mode: DisplayMode,

    /// Preferred tokenization, the engine may still fall back to characters
    #[serde(default)]
    pub granularity: Granularity,

    /// Maximum line distance (0-1) for two changed lines to be word-matched
    #[serde(default = "default_matching_threshold")]
    pub matching_threshold: f32,

    /// Ceiling on line pairings attempted per changed block
    #[serde(default = "default_max_comparisons")]
    pub max_comparisons: usize,
}

fn default_matching_threshold() -> f32 {
    DEFAULT_MATCHING_THRESHOLD
}

fn default_max_comparisons() -> usize {
    DEFAULT_MAX_COMPARISONS
}

impl DiffSettings {
    pub fn renderer_config(&self) -> RendererConfig {
        let layout = match self.mode {
            DisplayMode::Unified(layout) => layout,
            DisplayMode::Segments => OutputLayout::SideBySide,
        };
        RendererConfig {
            layout,
            matching_threshold: self.matching_threshold,
            max_comparisons: self.max_comparisons,
        }
    }
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            mode: DisplayMode::default(),
            granularity: Granularity::default(),
            matching_threshold: default_matching_threshold(),
            max_comparisons: default_max_comparisons(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_files_are_deduplicated_and_capped() {
        let mut settings = Settings::default();
        for i in 0..(MAX_RECENT_FILES + 3) {
            settings.push_recent_file(PathBuf::from(format!("/tmp/{i}.json")));
        }
        settings.push_recent_file(PathBuf::from("/tmp/5.json"));

        assert_eq!(settings.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(settings.recent_files[0], PathBuf::from("/tmp/5.json"));
        assert_eq!(
            settings
                .recent_files
                .iter()
                .filter(|p| **p == PathBuf::from("/tmp/5.json"))
                .count(),
            1
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.toast_timeout_ms, TOAST_TIMEOUT_MS);
        assert_eq!(settings.set_active_url_template, DEFAULT_SET_ACTIVE_URL);
        assert_eq!(settings.diff.max_comparisons, DEFAULT_MAX_COMPARISONS);
        assert!((settings.diff.matching_threshold - 0.25).abs() < f32::EPSILON);
    }
}
