//! Request, config and response files

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read a JSON or YAML document (`.yaml`/`.yml` select YAML)
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("cannot parse YAML {}", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("cannot parse JSON {}", path.display()))
    }
}

/// Render a value as pretty JSON followed by a newline
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(value).context("cannot render JSON")?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn reads_yaml_and_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("doc.yaml");
        std::fs::write(&yaml, "a:\n  b: [1, 2]\n").unwrap();
        let value: Value = read_document(&yaml).unwrap();
        assert_eq!(value, json!({"a": {"b": [1, 2]}}));

        let json_path = dir.path().join("doc.json");
        std::fs::write(&json_path, r#"{"a": true}"#).unwrap();
        let value: Value = read_document(&json_path).unwrap();
        assert_eq!(value, json!({"a": true}));
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_document::<Value>(Path::new("/nonexistent/request.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/request.json"));
    }
}
