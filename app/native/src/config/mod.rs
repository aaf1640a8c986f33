//! Configuration for `ParrotBar`.
//!
//! The configuration is read once, from the first existing file in
//! [`config_paths`] or from the path given with `--config`, and kept in a
//! process-wide [`OnceLock`].

pub mod schema;
pub mod template;
mod types;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub use types::{
    ConfigError, ParrotBarConfig, config_paths, load_config, load_config_from_path, parse_config,
};

use crate::platform::path::resolve_resource_dir;

static CONFIG: OnceLock<ParrotBarConfig> = OnceLock::new();

/// Path of the loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Override set with `--config`.
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Uses `path` instead of the default search paths.
///
/// Must be called before [`init`] or [`get_config`]. Returns `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

fn load_or_default() -> ParrotBarConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => {
            if CUSTOM_CONFIG_PATH.get().is_none() {
                create_default_config_file();
            }
            ParrotBarConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            ParrotBarConfig::default()
        }
    }
}

fn create_default_config_file() {
    let Some(config_path) = config_paths().into_iter().next() else {
        tracing::debug!("no config path available for creating template");
        return;
    };

    if config_path.exists() {
        return;
    }

    match template::create_config_file(&config_path) {
        Ok(()) => {
            let _ = CONFIG_PATH.set(config_path.clone());
            tracing::info!(path = %config_path.display(), "created default configuration file");
        }
        Err(err) => {
            tracing::debug!(
                error = %err,
                path = %config_path.display(),
                "failed to create default configuration file"
            );
        }
    }
}

/// Loads the configuration if needed and returns it.
pub fn init() -> &'static ParrotBarConfig { get_config() }

/// Returns the global configuration, loading it on first use.
pub fn get_config() -> &'static ParrotBarConfig { CONFIG.get_or_init(load_or_default) }

/// Path of the loaded configuration file, if one was read or created.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

impl ParrotBarConfig {
    /// Resource directory to use, with `override_dir` taking precedence over `resources`.
    ///
    /// Relative values resolve against `config_dir`.
    #[must_use]
    pub fn resource_dir(&self, override_dir: Option<&str>, config_dir: &Path) -> Option<PathBuf> {
        let configured = override_dir.unwrap_or(&self.resources);
        resolve_resource_dir(configured, config_dir)
    }
}
