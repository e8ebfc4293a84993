//! Traversal policy settings.
//!
//! A `WalkSettings` value is copied into the walker when it is built, so a
//! caller that keeps mutating its own instance never affects a walker that
//! already exists.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WalkError};

/// The three policy flags that steer a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalkSettings {
    /// Descend into directories that are symbolic links.
    pub follow_directory_symlinks: bool,
    /// Report files that are symbolic links.
    pub follow_file_symlinks: bool,
    /// Visit subdirectories below the root.
    pub recurse_directories: bool,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            follow_directory_symlinks: false,
            follow_file_symlinks: false,
            recurse_directories: true,
        }
    }
}

impl WalkSettings {
    pub fn with_follow_directory_symlinks(mut self, follow: bool) -> Self {
        self.follow_directory_symlinks = follow;
        self
    }

    pub fn with_follow_file_symlinks(mut self, follow: bool) -> Self {
        self.follow_file_symlinks = follow;
        self
    }

    pub fn with_recurse_directories(mut self, recurse: bool) -> Self {
        self.recurse_directories = recurse;
        self
    }

    /// Parses settings from a JSON document. Missing fields take their
    /// default values.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|error| WalkError::Settings(error.to_string()))
    }

    /// Reads and parses a JSON settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        log::debug!("loaded walk settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|error| WalkError::Settings(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_recurses_without_following_links() {
        let settings = WalkSettings::default();
        assert!(settings.recurse_directories);
        assert!(!settings.follow_directory_symlinks);
        assert!(!settings.follow_file_symlinks);
    }

    #[test]
    fn builder_setters() {
        let settings = WalkSettings::default()
            .with_follow_directory_symlinks(true)
            .with_follow_file_symlinks(true)
            .with_recurse_directories(false);
        assert!(settings.follow_directory_symlinks);
        assert!(settings.follow_file_symlinks);
        assert!(!settings.recurse_directories);
    }

    #[test]
    fn json_missing_fields_use_defaults() {
        let settings = WalkSettings::from_json(r#"{ "followFileSymlinks": true }"#).unwrap();
        assert!(settings.follow_file_symlinks);
        assert!(!settings.follow_directory_symlinks);
        assert!(settings.recurse_directories);
    }

    #[test]
    fn json_rejects_wrong_types() {
        let result = WalkSettings::from_json(r#"{ "recurseDirectories": "yes" }"#);
        assert!(matches!(result, Err(WalkError::Settings(_))));
    }

    #[test]
    fn load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("walk.json");
        let written = WalkSettings::default().with_recurse_directories(false);
        fs::write(&path, written.to_json().unwrap()).unwrap();

        let loaded = WalkSettings::load(&path).unwrap();
        assert_eq!(loaded, written);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = WalkSettings::load(&temp.path().join("absent.json"));
        assert!(matches!(result, Err(WalkError::Io(_))));
    }
}
