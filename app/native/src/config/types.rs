//! Configuration types and loading.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{
    APP_NAME, DEFAULT_SET_NAME, ICON_SIZE, RANDOM_MODE_INTERVAL, STATIC_FRAME_SIZE,
};

/// Root configuration for `ParrotBar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ParrotBarConfig {
    /// Directory holding the frame images, GIFs and `Offsets.json`.
    ///
    /// Supports `~`. Relative paths are resolved against the directory of the
    /// configuration file. Empty means the bundled `Resources` directory.
    pub resources: String,

    /// Set shown at launch and used when a selection has no frames.
    pub default_set: String,

    /// Side length, in pixels, of the frames shown in the status bar.
    pub icon_size: u32,

    /// Side length, in pixels, static frames are normalized to when loaded.
    pub static_frame_size: u32,

    /// Seconds between set changes while random mode is on.
    pub random_interval_secs: u64,

    /// Whether the default set starts animating right away.
    pub animate_on_launch: bool,
}

impl Default for ParrotBarConfig {
    fn default() -> Self {
        Self {
            resources: String::new(),
            default_set: DEFAULT_SET_NAME.to_string(),
            icon_size: ICON_SIZE,
            static_frame_size: STATIC_FRAME_SIZE,
            random_interval_secs: RANDOM_MODE_INTERVAL.as_secs(),
            animate_on_launch: true,
        }
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file exists but could not be read.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at ~/.config/parrotbar/config.jsonc \
                or ~/.parrotbar.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

const HOME_CONFIG_FILE_NAMES: &[&str] = &[".parrotbar.jsonc", ".parrotbar.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/parrotbar/config.jsonc` or `config.json`, if the variable is set
/// 2. `~/.config/parrotbar/config.jsonc` or `config.json`
/// 3. the platform config directory (`~/Library/Application Support/parrotbar/` on macOS)
/// 4. `~/.parrotbar.jsonc` or `~/.parrotbar.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let push_dir = |dir: PathBuf, paths: &mut Vec<PathBuf>| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        push_dir(PathBuf::from(xdg_config).join(APP_NAME), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join(APP_NAME), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join(APP_NAME), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Parses JSONC text into a configuration.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` if the text is not valid JSON once comments are stripped.
pub fn parse_config(text: &str) -> Result<ParrotBarConfig, ConfigError> {
    let reader = json_comments::StripComments::new(text.as_bytes());
    Ok(serde_json::from_reader(reader)?)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, `ConfigError::IoError` if it
/// cannot be read and `ConfigError::ParseError` if it is not valid JSONC.
pub fn load_config_from_path(path: &Path) -> Result<(ParrotBarConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: ParrotBarConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first existing file in [`config_paths`].
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected
/// locations, or the error of [`load_config_from_path`] for the first one that does.
pub fn load_config() -> Result<(ParrotBarConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParrotBarConfig::default();
        assert!(config.resources.is_empty());
        assert_eq!(config.default_set, "parrot");
        assert_eq!(config.icon_size, 27);
        assert_eq!(config.static_frame_size, 32);
        assert_eq!(config.random_interval_secs, 30);
        assert!(config.animate_on_launch);
    }

    #[test]
    fn test_parse_jsonc_with_comments() {
        let text = r#"{
            // Where the parrots live
            "resources": "~/parrots",
            /* bigger icon */
            "iconSize": 22,
            "animateOnLaunch": false
        }"#;

        let config = parse_config(text).unwrap();
        assert_eq!(config.resources, "~/parrots");
        assert_eq!(config.icon_size, 22);
        assert!(!config.animate_on_launch);
        assert_eq!(config.default_set, "parrot");
    }

    #[test]
    fn test_parse_empty_object_uses_defaults() {
        assert_eq!(parse_config("{}").unwrap(), ParrotBarConfig::default());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_config("{ \"iconSize\": }").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ \"defaultSet\": \"fiestaparrot\" }} // trailing comment").unwrap();

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.default_set, "fiestaparrot");
        assert_eq!(path, file.path());
    }

    #[test]
    fn test_load_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from_path(&dir.path().join("nope.jsonc")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound));
    }

    #[test]
    fn test_config_paths_prefer_jsonc() {
        let paths = config_paths();
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());

        if let Some(first) = paths.first() {
            assert!(first.to_string_lossy().ends_with("config.jsonc"));
        }
    }

    #[test]
    fn test_config_paths_end_with_home_files() {
        let paths = config_paths();
        if let Some(last) = paths.last() {
            assert!(last.to_string_lossy().ends_with(".parrotbar.json"));
        }
    }

    #[test]
    fn test_not_found_display() {
        assert!(ConfigError::NotFound.to_string().contains("No configuration file found"));
    }
}
