//! Configuration module for maidr-rs
//!
//! Settings are kept in a single TOML file. Every table and field is
//! optional; missing values take their defaults.
//!
//! # Settings Location
//!
//! The default settings file lives in the platform configuration directory:
//! - **Linux**: `~/.config/maidr-rs/settings.toml`
//! - **macOS**: `~/Library/Application Support/maidr-rs/settings.toml`
//! - **Windows**: `%APPDATA%\maidr-rs\settings.toml`
//!
//! # Example
//!
//! ```toml
//! [audio]
//! mode = "combined"
//! min_frequency = 250.0
//!
//! [autoplay]
//! total_duration_ms = 6000
//!
//! [keymap.TRACE]
//! MOVE_TO_NEXT_TRACE = "n"
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{MaidrError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application identifier for configuration directories
pub const APP_ID: &str = "maidr-rs";

/// Settings filename
pub const SETTINGS_FILE: &str = "settings.toml";

/// Get the default settings file path
pub fn settings_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID).join(SETTINGS_FILE))
}

/// Keymap overrides: scope name -> command name -> key chord
pub type KeymapOverrides = BTreeMap<String, BTreeMap<String, String>>;

/// User settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub autoplay: AutoplaySettings,
    pub text: TextSettings,
    pub braille: BrailleSettings,
    pub keymap: KeymapOverrides,
}

impl Settings {
    /// Load settings from a TOML file
    ///
    /// A missing file yields the defaults. The loaded values are validated
    /// and every correction is logged.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            MaidrError::Config(format!("Failed to read settings {:?}: {}", path, e))
        })?;

        let mut settings: Settings = toml::from_str(&content).map_err(|e| {
            MaidrError::Config(format!("Failed to parse settings {:?}: {}", path, e))
        })?;
        settings.validate();
        Ok(settings)
    }

    /// Load settings, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings to a TOML file, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    MaidrError::Config(format!("Failed to create settings directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MaidrError::Serialization(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| MaidrError::Config(format!("Failed to write settings {:?}: {}", path, e)))
    }

    /// Clamp out-of-range values, logging each correction
    pub fn validate(&mut self) {
        let fixes = self
            .audio
            .validate()
            .into_iter()
            .chain(self.autoplay.validate());
        for fix in fixes {
            tracing::warn!("Settings corrected: {}", fix);
        }
    }
}
