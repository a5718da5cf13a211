//! User settings for a binding run
//!
//! Stored as JSON so they can be edited by hand:
//! - Linux: ~/.config/photo-binder/settings.json
//! - macOS: ~/Library/Application Support/photo-binder/settings.json
//! - Windows: %APPDATA%\photo-binder\settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::classifier::DEFAULT_TOLERANCE;
use crate::error::SettingsError;
use crate::namer::sanitize;

/// Order in which discovered photos are fed to the segmenter
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryOrder {
    /// Whatever the directory listing returns
    #[default]
    Listing,
    /// Sorted by file name
    Name,
    /// Sorted by modification time, oldest first
    Modified,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Fraction of maximum luminance at or below which a pixel counts as dark (0.0 to 1.0)
    pub tolerance: f64,

    /// File extensions picked up from the folder, compared case-insensitively
    pub extensions: Vec<String>,

    pub order: DiscoveryOrder,

    /// Group name used when the prompt is cancelled or yields nothing usable
    pub default_name: String,

    /// Display width of every photo in the generated document
    pub image_width_inches: f64,

    /// Add the photo's file name under each embedded photo
    pub captions: bool,

    /// Persist the run report as JSON in the data directory
    pub save_report: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            extensions: vec!["jpg".to_string()],
            order: DiscoveryOrder::Listing,
            default_name: "Unnamed".to_string(),
            image_width_inches: 5.5,
            captions: false,
            save_report: true,
        }
    }
}

impl Settings {
    /// Load settings from the user's config directory, or defaults if none are saved
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::default_path())
    }

    /// Get the path where the settings file lives
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_default();

        path.push("photo-binder");
        path.push("settings.json");
        path
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings = Self::from_json(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;

        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(SettingsError::Invalid {
                field: "tolerance",
                reason: format!("{} is outside 0.0..=1.0", self.tolerance),
            });
        }

        if self.extensions.is_empty() || self.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(SettingsError::Invalid {
                field: "extensions",
                reason: "at least one non-empty extension is required".to_string(),
            });
        }

        if self.default_name.is_empty() || sanitize(&self.default_name) != self.default_name {
            return Err(SettingsError::Invalid {
                field: "default_name",
                reason: format!(
                    "{:?} must be non-empty and use only letters, digits, spaces, dots or underscores",
                    self.default_name
                ),
            });
        }

        if !(self.image_width_inches.is_finite() && self.image_width_inches > 0.0) {
            return Err(SettingsError::Invalid {
                field: "image_width_inches",
                reason: format!("{} is not a positive width", self.image_width_inches),
            });
        }

        Ok(())
    }

    /// Check whether a path carries one of the configured extensions
    pub fn matches_extension(&self, path: &Path) -> bool {
        let Some(extension) = path.extension() else {
            return false;
        };
        let ext = extension.to_string_lossy().to_lowercase();
        self.extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}
