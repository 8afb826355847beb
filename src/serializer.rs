//! Rendering the specification as YAML or JSON text and writing it out.

use crate::spec::ApiSpec;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Renders the spec as YAML.
///
/// # Example
///
/// ```
/// use swagger_from_source::serializer::serialize_yaml;
/// use swagger_from_source::spec::ApiSpec;
///
/// let yaml = serialize_yaml(&ApiSpec::new("Test API", "0.0.1", "2.0")).unwrap();
/// assert!(yaml.contains("swagger: '2.0'"));
/// ```
pub fn serialize_yaml(spec: &ApiSpec) -> Result<String> {
    debug!("Serializing specification to YAML");
    serde_yaml::to_string(&spec.to_value()).context("Failed to serialize specification to YAML")
}

/// Renders the spec as pretty-printed JSON.
pub fn serialize_json(spec: &ApiSpec) -> Result<String> {
    debug!("Serializing specification to JSON");
    serde_json::to_string_pretty(&spec.to_value())
        .context("Failed to serialize specification to JSON")
}

/// Writes `content` to `path`, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::document_response;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_spec() -> ApiSpec {
        let mut spec = ApiSpec::new("Test API", "1.0.0", "2.0");
        document_response(&mut spec, "/users/{id}", "get", 200, json!({"description": "ok"}));
        spec
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_spec()).unwrap();

        assert!(yaml.contains("swagger: '2.0'"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("/users/{id}:"));
        assert!(yaml.contains("'200':"));

        let parsed: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, create_test_spec().to_value());
    }

    #[test]
    fn test_serialize_json_pretty_format() {
        let json = serialize_json(&create_test_spec()).unwrap();

        assert!(json.lines().count() > 5, "Pretty printed JSON should have multiple lines");

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["swagger"], "2.0");
        assert_eq!(
            parsed["paths"]["/users/{id}"]["get"]["responses"]["200"]["description"],
            "ok"
        );
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("docs").join("swagger.json");

        write_to_file("first", &file_path).unwrap();
        write_to_file("second", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "second");
    }
}
