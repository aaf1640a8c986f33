//! JSON Schema of the configuration file.

use super::ParrotBarConfig;

/// Generates the JSON Schema describing [`ParrotBarConfig`].
#[must_use]
pub fn generate_schema() -> schemars::Schema { schemars::schema_for!(ParrotBarConfig) }

/// Pretty-printed [`generate_schema`].
#[must_use]
pub fn generate_schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_config() {
        let parsed: serde_json::Value = serde_json::from_str(&generate_schema_json()).unwrap();

        assert_eq!(parsed["title"], "ParrotBarConfig");
        assert_eq!(parsed["$schema"], "https://json-schema.org/draft/2020-12/schema");
        assert!(parsed["properties"]["resources"].is_object());
        assert!(parsed["properties"]["iconSize"].is_object());
        assert!(parsed["properties"]["animateOnLaunch"].is_object());
    }
}
