//! Document roots and root-qualified paths
//!
//! A reference reads from one of three roots (`spec`, `status`, `context`);
//! a target writes into `status` or `context`. Both are written as
//! `<root>.<path>` where `<path>` follows the dot/bracket grammar.
//!
//! [`RootsContext`] carries the documents of one invocation and owns the
//! root-selection rules:
//! - `status` prefers the desired composite's status, falling back to the
//!   observed one when the desired status is absent or empty
//! - `spec` is read from the desired composite after the observed spec has
//!   been copied down into it
//! - `context` is the shared pipeline context, read and written directly

use crate::composite::Composite;
use crate::error::{FunctionError, FunctionResult};
use graphfn_document::{has_data_in, FieldPath, Map, Value};
use std::fmt::{self, Display, Formatter};

/// Named document root a reference can read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    /// Declared composite spec
    Spec,
    /// Computed composite status
    Status,
    /// Shared pipeline context
    Context,
}

impl RootKind {
    /// Match a root literal (case-sensitive)
    #[must_use]
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "spec" => Some(Self::Spec),
            "status" => Some(Self::Status),
            "context" => Some(Self::Context),
            _ => None,
        }
    }

    /// Root literal as written in references
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spec => "spec",
            Self::Status => "status",
            Self::Context => "context",
        }
    }
}

impl Display for RootKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split `<root>.<rest>` at the first dot
fn split_root(raw: &str) -> (&str, &str) {
    raw.split_once('.').unwrap_or((raw, ""))
}

/// Root-qualified path used to read a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    raw: String,
    root: RootKind,
    path: FieldPath,
}

impl Reference {
    /// Parse `<root>.<path>`
    ///
    /// # Errors
    /// [`FunctionError::UnsupportedRoot`] for an unknown root literal, or
    /// [`FunctionError::InvalidPath`] naming `raw` when the remainder does not
    /// parse.
    pub fn parse(raw: &str) -> FunctionResult<Self> {
        let (root, rest) = split_root(raw);
        let root = RootKind::from_literal(root).ok_or_else(|| FunctionError::UnsupportedRoot {
            root: root.to_string(),
            reference: raw.to_string(),
        })?;
        let path = FieldPath::parse(rest).map_err(|e| FunctionError::invalid_path(raw, e))?;
        Ok(Self {
            raw: raw.to_string(),
            root,
            path,
        })
    }

    /// Root this reference reads from
    #[inline]
    #[must_use]
    pub fn root(&self) -> RootKind {
        self.root
    }

    /// Path below the root
    #[inline]
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Reference as written
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Root a result can be written into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRoot {
    /// Desired composite status
    Status,
    /// Shared pipeline context
    Context,
}

impl From<TargetRoot> for RootKind {
    fn from(root: TargetRoot) -> Self {
        match root {
            TargetRoot::Status => RootKind::Status,
            TargetRoot::Context => RootKind::Context,
        }
    }
}

/// Root-qualified path used to write a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    raw: String,
    root: TargetRoot,
    path: FieldPath,
}

impl Target {
    /// Parse `status.<path>` or `context.<path>`
    ///
    /// # Errors
    /// [`FunctionError::UnrecognizedTarget`] for any other root (including
    /// `spec`) or a bare root, and [`FunctionError::InvalidPath`] naming `raw`
    /// when the remainder does not parse.
    pub fn parse(raw: &str) -> FunctionResult<Self> {
        let (root, rest) = split_root(raw);
        let root = match RootKind::from_literal(root) {
            Some(RootKind::Status) => TargetRoot::Status,
            Some(RootKind::Context) => TargetRoot::Context,
            Some(RootKind::Spec) | None => {
                return Err(FunctionError::UnrecognizedTarget(raw.to_string()))
            }
        };
        if rest.is_empty() {
            return Err(FunctionError::UnrecognizedTarget(raw.to_string()));
        }
        let path = FieldPath::parse(rest).map_err(|e| FunctionError::invalid_path(raw, e))?;
        Ok(Self {
            raw: raw.to_string(),
            root,
            path,
        })
    }

    /// Root this target writes into
    #[inline]
    #[must_use]
    pub fn root(&self) -> TargetRoot {
        self.root
    }

    /// Path below the root
    #[inline]
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Target as written
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Documents of a single invocation
///
/// Passed explicitly into every resolver and publisher call. The function
/// mutates its own copy and hands the desired composite and context back for
/// persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootsContext {
    observed: Composite,
    desired: Composite,
    context: Map<String, Value>,
}

impl RootsContext {
    /// Create from the observed composite, desired composite and context
    #[inline]
    #[must_use]
    pub fn new(observed: Composite, desired: Composite, context: Map<String, Value>) -> Self {
        Self {
            observed,
            desired,
            context,
        }
    }

    /// Seed the desired composite from the observed one
    ///
    /// Copies identity (`apiVersion`, `kind`, `metadata.name`) when the desired
    /// composite has no kind yet, then carries the current status forward so
    /// that later writes do not drop it. The context is left as is.
    pub fn seed_desired(&mut self) {
        if self.desired.kind().is_empty() {
            self.desired.set_api_version(self.observed.api_version());
            self.desired.set_kind(self.observed.kind());
            if let Some(name) = self.observed.name() {
                self.desired.set_name(name);
            }
        }

        if let Some(status) = self.status().filter(|s| !s.is_empty()).cloned() {
            self.desired.set_status(status);
        }
    }

    /// Current status: desired if non-empty, else observed
    #[must_use]
    pub fn status(&self) -> Option<&Map<String, Value>> {
        match self.desired.status() {
            Some(status) if !status.is_empty() => Some(status),
            _ => {
                tracing::debug!("desired status is empty, falling back to observed status");
                self.observed.status()
            }
        }
    }

    /// Declared spec, read through the desired composite
    ///
    /// Observed spec keys missing from the desired spec are copied down
    /// first. Values already in the desired spec win.
    pub fn spec(&mut self) -> Option<&Map<String, Value>> {
        if let Some(observed) = self.observed.spec() {
            let mut spec = self.desired.spec().cloned().unwrap_or_default();
            let before = spec.len();
            for (key, value) in observed {
                if !spec.contains_key(key) {
                    spec.insert(key.clone(), value.clone());
                }
            }
            if spec.len() != before || self.desired.spec().is_none() {
                self.desired.set_spec(spec);
            }
        }
        self.desired.spec()
    }

    /// Document backing a root, if any
    pub fn document(&mut self, root: RootKind) -> Option<&Map<String, Value>> {
        match root {
            RootKind::Spec => self.spec(),
            RootKind::Status => self.status(),
            RootKind::Context => Some(&self.context),
        }
    }

    /// Check whether a target already holds meaningful data
    ///
    /// Status targets are checked against the current status (desired first,
    /// else observed).
    #[must_use]
    pub fn has_data_at(&self, target: &Target) -> bool {
        match target.root() {
            TargetRoot::Status => self
                .status()
                .is_some_and(|status| has_data_in(status, target.path())),
            TargetRoot::Context => has_data_in(&self.context, target.path()),
        }
    }

    /// Replace the desired status wholesale
    pub fn set_status(&mut self, status: Map<String, Value>) {
        self.desired.set_status(status);
    }

    /// Observed composite
    #[inline]
    #[must_use]
    pub fn observed(&self) -> &Composite {
        &self.observed
    }

    /// Desired composite
    #[inline]
    #[must_use]
    pub fn desired(&self) -> &Composite {
        &self.desired
    }

    /// Shared pipeline context
    #[inline]
    #[must_use]
    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Mutable shared pipeline context
    #[inline]
    pub fn context_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.context
    }

    /// Hand back the desired composite and context for persistence
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (Composite, Map<String, Value>) {
        (self.desired, self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn composite(value: Value) -> Composite {
        serde_json::from_value(value).unwrap()
    }

    fn map(value: Value) -> Map<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reference_parse() {
        let reference = Reference::parse("status.[strange.nested.field.with.dots].result").unwrap();
        assert_eq!(reference.root(), RootKind::Status);
        assert_eq!(
            reference.path().segments(),
            &["strange.nested.field.with.dots", "result"]
        );
        assert_eq!(reference.to_string(), "status.[strange.nested.field.with.dots].result");
    }

    #[test]
    fn reference_unknown_root() {
        let err = Reference::parse("metadata.name").unwrap_err();
        assert!(matches!(err, FunctionError::UnsupportedRoot { root, .. } if root == "metadata"));

        // Root literals are case-sensitive
        assert!(Reference::parse("Status.name").is_err());
        assert!(Reference::parse("[status].name").is_err());
    }

    #[test]
    fn reference_without_path_is_invalid() {
        for raw in ["status", "spec", "context."] {
            let err = Reference::parse(raw).unwrap_err();
            assert!(matches!(&err, FunctionError::InvalidPath { raw: r, .. } if r == raw));
        }
    }

    #[test]
    fn malformed_path_names_whole_string() {
        let err = Target::parse("context.a..b").unwrap_err();
        assert!(matches!(&err, FunctionError::InvalidPath { raw, .. } if raw == "context.a..b"));
        assert!(err.to_string().contains("context.a..b"));

        let err = Reference::parse("status.[open").unwrap_err();
        assert!(err.to_string().contains("status.[open"));
    }

    #[test]
    fn target_parse() {
        let target = Target::parse("context.[apiextensions.crossplane.io/environment].result").unwrap();
        assert_eq!(target.root(), TargetRoot::Context);
        assert_eq!(
            target.path().segments(),
            &["apiextensions.crossplane.io/environment", "result"]
        );
    }

    #[test]
    fn target_rejects_spec_and_unknown_roots() {
        for raw in ["spec.field", "metadata.name", "", "status", "context", "status."] {
            let err = Target::parse(raw);
            assert!(matches!(err, Err(FunctionError::UnrecognizedTarget(t)) if t == raw));
        }
        assert_eq!(
            Target::parse("status").unwrap_err().to_string(),
            "Unrecognized target field: status"
        );
    }

    #[test]
    fn status_prefers_desired() {
        let roots = RootsContext::new(
            composite(json!({"status": {"from": "observed"}})),
            composite(json!({"status": {"from": "desired"}})),
            Map::new(),
        );
        assert_eq!(roots.status().unwrap()["from"], json!("desired"));
    }

    #[test]
    fn status_falls_back_to_observed_when_desired_empty() {
        let roots = RootsContext::new(
            composite(json!({"status": {"azResourceGraphQuery": "Q"}})),
            composite(json!({"status": {}})),
            Map::new(),
        );
        assert_eq!(roots.status().unwrap()["azResourceGraphQuery"], json!("Q"));
    }

    #[test]
    fn seed_desired_copies_identity_and_status() {
        let mut roots = RootsContext::new(
            composite(json!({
                "apiVersion": "example.org/v1",
                "kind": "XR",
                "metadata": {"name": "cool-xr", "uid": "1234"},
                "spec": {"count": 2},
                "status": {"groups": ["a"]}
            })),
            Composite::new(),
            map(json!({"keep": true})),
        );

        roots.seed_desired();

        assert_eq!(
            serde_json::to_value(roots.desired()).unwrap(),
            json!({
                "apiVersion": "example.org/v1",
                "kind": "XR",
                "metadata": {"name": "cool-xr"},
                "status": {"groups": ["a"]}
            })
        );
        assert_eq!(roots.context(), &map(json!({"keep": true})));
    }

    #[test]
    fn seed_desired_keeps_existing_desired() {
        let mut roots = RootsContext::new(
            composite(json!({"apiVersion": "v1", "kind": "Observed", "status": {"a": 1}})),
            composite(json!({"apiVersion": "v2", "kind": "Desired", "status": {"b": 2}})),
            Map::new(),
        );

        roots.seed_desired();

        assert_eq!(roots.desired().kind(), "Desired");
        assert_eq!(roots.desired().status(), Some(&map(json!({"b": 2}))));
    }

    #[test]
    fn spec_is_copied_down() {
        let mut roots = RootsContext::new(
            composite(json!({"spec": {"group": "observed"}})),
            Composite::new(),
            Map::new(),
        );
        assert_eq!(roots.spec().unwrap()["group"], json!("observed"));
        assert_eq!(roots.desired().spec().unwrap()["group"], json!("observed"));

        let mut edited = RootsContext::new(
            composite(json!({"spec": {"group": "observed"}})),
            composite(json!({"spec": {"group": "edited"}})),
            Map::new(),
        );
        assert_eq!(edited.spec().unwrap()["group"], json!("edited"));
    }

    #[test]
    fn spec_copy_down_fills_keys_missing_from_desired() {
        let mut roots = RootsContext::new(
            composite(json!({"spec": {"groupName": "Ops", "group": "observed"}})),
            composite(json!({"spec": {"edited": "yes", "group": "edited"}})),
            Map::new(),
        );

        assert_eq!(
            roots.spec(),
            Some(&map(json!({"edited": "yes", "group": "edited", "groupName": "Ops"})))
        );
        assert_eq!(roots.desired().spec().unwrap()["groupName"], json!("Ops"));
    }

    #[test]
    fn has_data_at_checks_target_root() {
        let roots = RootsContext::new(
            composite(json!({"status": {"groupMembers": [{"id": "1"}], "empty": []}})),
            Composite::new(),
            map(json!({"result": {"a": 1}, "blank": ""})),
        );
        let has = |raw: &str| roots.has_data_at(&Target::parse(raw).unwrap());

        assert!(has("status.groupMembers"));
        assert!(!has("status.empty"));
        assert!(!has("status.missing"));
        assert!(has("context.result"));
        assert!(!has("context.blank"));
        assert!(!has("context.result.a.deeper"));
    }

    #[test]
    fn into_parts_returns_desired_and_context() {
        let mut roots = RootsContext::new(Composite::new(), Composite::new(), Map::new());
        roots.context_mut().insert("k".into(), json!(1));
        roots.set_status(map(json!({"s": 1})));

        let (desired, context) = roots.into_parts();
        assert_eq!(desired.status(), Some(&map(json!({"s": 1}))));
        assert_eq!(context, map(json!({"k": 1})));
    }
}
