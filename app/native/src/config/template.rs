//! Configuration template generation.

use std::fs;
use std::path::Path;

/// Generates a configuration template with every option commented out at its default.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// ParrotBar Configuration File
// ============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // Directory holding the frame images (parrot1.png ... parrot10.png),
  // the GIF sets and Offsets.json. Supports "~". Relative paths are
  // resolved against this file's directory. Empty uses the bundled set.
  // "resources": "",

  // Set shown at launch, and the fallback when a set has no frames.
  // "defaultSet": "parrot",

  // Size in pixels of the status bar icon.
  // "iconSize": 27,

  // Size in pixels static frames are normalized to when loaded.
  // "staticFrameSize": 32,

  // Seconds between changes while random mode is on.
  // "randomIntervalSecs": 30,

  // Start animating the default set right away.
  // "animateOnLaunch": true
}
"#
    .to_string()
}

/// Writes the template to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParrotBarConfig, parse_config};

    #[test]
    fn test_template_parses_to_defaults() {
        let config = parse_config(&generate_config_template()).unwrap();
        assert_eq!(config, ParrotBarConfig::default());
    }

    #[test]
    fn test_template_mentions_every_option() {
        let template = generate_config_template();
        for key in [
            "resources",
            "defaultSet",
            "iconSize",
            "staticFrameSize",
            "randomIntervalSecs",
            "animateOnLaunch",
        ] {
            assert!(template.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_create_config_file_makes_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.jsonc");

        create_config_file(&path).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), generate_config_template());
    }
}
