//! Settings persistence system
//!
//! Saves and loads [`GameSettings`] to/from a JSON file in the user's
//! configuration directory.
//!
//! # Error Handling
//!
//! - Load failures fall back to default settings (the caller logs why)
//! - Save failures are logged but don't interrupt gameplay

use super::error::{CoreError, CoreResult};
use crate::core::GameSettings;
use bevy::prelude::*;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Resolve the settings file path
///
/// E.g. `~/.config/chess3d/settings.json` on Linux. Falls back to a local
/// `settings.json` if the system config dir cannot be found.
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "chess3d", "chess3d") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Read settings from `path`.
///
/// A missing file is not an error: it yields `Ok(None)`.
pub fn read_settings(path: &Path) -> CoreResult<Option<GameSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| CoreError::SettingsIo {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = serde_json::from_str::<GameSettings>(&contents)?;
    Ok(Some(settings))
}

/// Write settings to `path`, creating parent directories as needed.
pub fn write_settings(path: &Path, settings: &GameSettings) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| CoreError::SettingsIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).map_err(|source| CoreError::SettingsIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from the default location, falling back to defaults.
///
/// Runs before the app (and therefore the log subscriber) exists, so the
/// outcome is returned as a note for `main` to log once logging is up.
pub fn load_settings() -> (GameSettings, String) {
    let path = settings_path();
    match read_settings(&path) {
        Ok(Some(settings)) => (settings, format!("Loaded settings from {:?}", path)),
        Ok(None) => (
            GameSettings::default(),
            format!("No settings file found at {:?}. Using defaults.", path),
        ),
        Err(e) => (
            GameSettings::default(),
            format!("Failed to load settings: {}. Using defaults.", e),
        ),
    }
}

/// Save settings to file when they change
pub fn save_settings_system(settings: Res<GameSettings>) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }

    let path = settings_path();
    match write_settings(&path, &settings) {
        Ok(()) => info!("[SETTINGS] Saved settings to {:?}", path),
        Err(e) => error!("[SETTINGS] {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chess3d-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = scratch_dir("missing");
        let result = read_settings(&dir.join("settings.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_write_then_read_creates_directories() {
        //! Writing into a directory that doesn't exist yet must create it
        let dir = scratch_dir("write");
        let path = dir.join("nested").join("settings.json");

        let mut settings = GameSettings::default();
        settings.show_hints = false;
        write_settings(&path, &settings).unwrap();

        let loaded = read_settings(&path).unwrap().unwrap();
        assert_eq!(loaded, settings);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_settings(&path).unwrap_err();
        assert!(matches!(err, CoreError::SettingsSerialization(_)));
        let _ = fs::remove_dir_all(&dir);
    }
}
