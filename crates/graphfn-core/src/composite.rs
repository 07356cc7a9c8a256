//! Composite resource documents
//!
//! A composite is the declared resource a pipeline works on. Only a handful
//! of well-known fields are interpreted here; everything else is carried
//! through untouched.

use graphfn_document::{Map, Value};
use serde::{Deserialize, Serialize};

/// Composite resource document (observed or desired)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composite(Map<String, Value>);

impl Composite {
    /// Create empty composite
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing mapping
    #[inline]
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Borrow the full resource mapping
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwrap into the resource mapping
    #[inline]
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// `apiVersion`, empty when unset
    #[must_use]
    pub fn api_version(&self) -> &str {
        self.str_field("apiVersion")
    }

    /// `kind`, empty when unset
    #[must_use]
    pub fn kind(&self) -> &str {
        self.str_field("kind")
    }

    /// `metadata.name`, if set
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

    /// Set `apiVersion`
    pub fn set_api_version(&mut self, api_version: impl Into<String>) {
        self.0
            .insert("apiVersion".to_string(), Value::String(api_version.into()));
    }

    /// Set `kind`
    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.0.insert("kind".to_string(), Value::String(kind.into()));
    }

    /// Set `metadata.name`, keeping any other metadata
    pub fn set_name(&mut self, name: impl Into<String>) {
        let metadata = self
            .0
            .entry("metadata".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !metadata.is_object() {
            *metadata = Value::Object(Map::new());
        }
        if let Value::Object(map) = metadata {
            map.insert("name".to_string(), Value::String(name.into()));
        }
    }

    /// `status` mapping, if present
    #[must_use]
    pub fn status(&self) -> Option<&Map<String, Value>> {
        self.0.get("status").and_then(Value::as_object)
    }

    /// Replace the whole `status` mapping
    pub fn set_status(&mut self, status: Map<String, Value>) {
        self.0.insert("status".to_string(), Value::Object(status));
    }

    /// `spec` mapping, if present
    #[must_use]
    pub fn spec(&self) -> Option<&Map<String, Value>> {
        self.0.get("spec").and_then(Value::as_object)
    }

    /// Replace the whole `spec` mapping
    pub fn set_spec(&mut self, spec: Map<String, Value>) {
        self.0.insert("spec".to_string(), Value::Object(spec));
    }

    fn str_field(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for Composite {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
