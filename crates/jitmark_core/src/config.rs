//! Engine configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jitmark_layout::ThemePreset;
use jitmark_plugin::github::GitHubEnrichmentOptions;
use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::EngineError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration for the markdown engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Editor schema hint; ignored.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Materialize block-level HTML instead of dropping it.
    pub allow_html: bool,

    /// GitHub enrichment. Disabled when absent.
    pub github: Option<GitHubEnrichmentOptions>,

    /// Layout and viewport defaults.
    pub layout: LayoutConfig,
}

/// Layout defaults applied by [`MarkdownEngine`](crate::MarkdownEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub width: f32,
    pub scale: f32,
    pub viewport_height: f32,
    pub overscan: f32,
    pub theme: ThemePreset,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            scale: 1.0,
            viewport_height: 600.0,
            overscan: 0.0,
            theme: ThemePreset::Light,
        }
    }
}

impl EngineConfig {
    /// Config file names looked up by [`discover`](Self::discover), in priority order.
    pub const CONFIG_FILES: [&'static str; 2] = [".jitmark.jsonc", ".jitmark.json"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the first config file present in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.jitmark.jsonc`, `.jitmark.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parses configuration from JSON (comments allowed) with schema validation.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| EngineError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        if let Err(e) = config_schema()?.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(EngineError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| EngineError::config(format!("Invalid config: {}", e)))
    }
}

fn config_schema() -> Result<&'static Validator, EngineError> {
    if let Some(validator) = CONFIG_SCHEMA.get() {
        return Ok(validator);
    }

    let schema_json: serde_json::Value = serde_json::from_str(SCHEMA_JSON)
        .map_err(|e| EngineError::config(format!("Invalid embedded config schema: {}", e)))?;
    let validator = Validator::new(&schema_json)
        .map_err(|e| EngineError::config(format!("Invalid config schema compilation: {}", e)))?;
    Ok(CONFIG_SCHEMA.get_or_init(|| validator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_config_default() {
        let config = EngineConfig::default();
        assert!(!config.allow_html);
        assert!(config.github.is_none());
        assert_eq!(config.layout.width, 800.0);
        assert_eq!(config.layout.scale, 1.0);
        assert_eq!(config.layout.theme, ThemePreset::Light);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "allow_html": true,
            "github": { "repository_slug": "octo/repo" },
            "layout": { "width": 640, "theme": "dark" }
        }"#;

        let config = EngineConfig::from_json(json).unwrap();
        assert!(config.allow_html);

        let github = config.github.unwrap();
        assert_eq!(github.repository(), Some("octo/repo"));
        assert_eq!(github.base_url(), "https://github.com");
        assert!(github.allow_short_shas);

        assert_eq!(config.layout.width, 640.0);
        assert_eq!(config.layout.scale, 1.0);
        assert_eq!(config.layout.theme, ThemePreset::Dark);
    }

    #[test]
    fn test_config_with_comments() {
        let json = r#"{
            // enrich GitHub references
            "github": { "allow_short_shas": false } /* trailing */
        }"#;

        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.github.map(|g| g.allow_short_shas), Some(false));
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_json("").unwrap(), EngineConfig::default());
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_schema_key_accepted() {
        let config = EngineConfig::from_json(r#"{ "$schema": "./config.json" }"#).unwrap();
        assert_eq!(config.schema.as_deref(), Some("./config.json"));
    }

    #[rstest]
    #[case::unknown_property(r#"{ "allow_htm": true }"#, "Config validation failed")]
    #[case::type_mismatch(r#"{ "allow_html": "yes" }"#, "Config validation failed")]
    #[case::unknown_theme(r#"{ "layout": { "theme": "sepia" } }"#, "Config validation failed")]
    #[case::zero_scale(r#"{ "layout": { "scale": 0 } }"#, "Config validation failed")]
    #[case::unknown_github_key(
        r#"{ "github": { "repo": "a/b" } }"#,
        "Config validation failed"
    )]
    #[case::malformed(r#"{ "allow_html": "#, "Invalid JSON")]
    fn test_config_validation_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let err = EngineConfig::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains(expected_error_part),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_from_file_and_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EngineConfig::discover(dir.path()).is_none());

        fs::write(dir.path().join(".jitmark.json"), r#"{ "allow_html": true }"#).unwrap();
        fs::write(
            dir.path().join(".jitmark.jsonc"),
            "{ // preferred\n \"layout\": { \"width\": 300 } }",
        )
        .unwrap();

        let path = EngineConfig::discover(dir.path()).unwrap();
        assert!(path.ends_with(".jitmark.jsonc"));

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.layout.width, 300.0);
        assert!(!config.allow_html);
    }

    #[test]
    fn test_from_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/.jitmark.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
