//! Result publication
//!
//! Writes a computed value into the status or context root. The value
//! replaces whatever was stored at the target path; everything else in the
//! root is preserved.

use crate::error::{FunctionError, FunctionResult};
use crate::roots::{RootsContext, Target, TargetRoot};
use graphfn_document::{set, Value};

/// Publish `value` at a target string
///
/// # Errors
/// [`FunctionError::UnrecognizedTarget`] for roots other than `status` and
/// `context` or a bare root, [`FunctionError::InvalidPath`] for a malformed
/// path, or [`FunctionError::Publish`] when an
/// intermediate value is not a mapping.
pub fn publish(target: &str, value: Value, roots: &mut RootsContext) -> FunctionResult<()> {
    let target = Target::parse(target)?;
    publish_to(&target, value, roots)
}

/// Publish `value` at an already parsed target
///
/// # Errors
/// [`FunctionError::Publish`] when an intermediate value is not a mapping.
/// The roots are left untouched in that case.
pub fn publish_to(target: &Target, value: Value, roots: &mut RootsContext) -> FunctionResult<()> {
    let wrap = |source| FunctionError::Publish {
        target: target.to_string(),
        source,
    };

    match target.root() {
        TargetRoot::Status => {
            let mut status = roots.status().cloned().unwrap_or_default();
            set(&mut status, target.path(), value).map_err(wrap)?;
            roots.set_status(status);
            tracing::debug!(target_path = %target, "updated desired composite status");
        }
        TargetRoot::Context => {
            set(roots.context_mut(), target.path(), value).map_err(wrap)?;
            tracing::debug!(target_path = %target, "updated composition pipeline context");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphfn_document::Map;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn roots(observed: Value, desired: Value, context: Value) -> RootsContext {
        RootsContext::new(
            serde_json::from_value(observed).unwrap(),
            serde_json::from_value(desired).unwrap(),
            serde_json::from_value(context).unwrap(),
        )
    }

    #[test]
    fn publish_to_status_keeps_other_fields() {
        let mut roots = roots(
            json!({}),
            json!({
                "apiVersion": "example.org/v1",
                "kind": "XR",
                "spec": {"count": 2},
                "status": {"groups": ["Developers"]}
            }),
            json!({}),
        );

        publish("status.groupObjectIDs", json!([{"id": "group-id-1"}]), &mut roots).unwrap();

        assert_eq!(
            serde_json::to_value(roots.desired()).unwrap(),
            json!({
                "apiVersion": "example.org/v1",
                "kind": "XR",
                "spec": {"count": 2},
                "status": {
                    "groups": ["Developers"],
                    "groupObjectIDs": [{"id": "group-id-1"}]
                }
            })
        );
    }

    #[test]
    fn publish_to_status_starts_from_observed_when_desired_empty() {
        let mut roots = roots(
            json!({"status": {"existing": "value"}}),
            json!({"kind": "XR"}),
            json!({}),
        );

        publish("status.nested.result", json!("done"), &mut roots).unwrap();

        assert_eq!(
            roots.desired().status().cloned().map(Value::Object),
            Some(json!({"existing": "value", "nested": {"result": "done"}}))
        );
    }

    #[test]
    fn publish_to_context_with_bracket_key() {
        let mut roots = roots(json!({}), json!({}), json!({"unrelated": {"keep": true}}));

        publish(
            "context.[apiextensions.crossplane.io/environment].result",
            json!({"a": 1}),
            &mut roots,
        )
        .unwrap();

        assert_eq!(
            Value::Object(roots.context().clone()),
            json!({
                "unrelated": {"keep": true},
                "apiextensions.crossplane.io/environment": {"result": {"a": 1}}
            })
        );
    }

    #[test]
    fn publish_replaces_existing_subtree() {
        let mut roots = roots(json!({}), json!({}), json!({"result": {"old": 1, "stale": 2}}));
        publish("context.result", json!({"new": 1}), &mut roots).unwrap();
        assert_eq!(roots.context()["result"], json!({"new": 1}));
    }

    #[test]
    fn publish_type_conflict_leaves_roots_untouched() {
        let mut roots = roots(
            json!({}),
            json!({"kind": "XR", "status": {"name": "scalar"}}),
            json!({"name": "scalar"}),
        );
        let before = roots.clone();

        let err = publish("status.name.inner", json!(1), &mut roots).unwrap_err();
        assert_eq!(err.to_string(), r#"cannot set status.name.inner: key "name" exists but is not a map"#);

        let err = publish("context.name.inner", json!(1), &mut roots).unwrap_err();
        assert!(matches!(err, FunctionError::Publish { .. }));

        assert_eq!(roots, before);
    }

    #[test]
    fn publish_unrecognized_targets() {
        let mut roots = RootsContext::default();
        for target in ["spec.field", "other.field", "", "status"] {
            assert!(matches!(
                publish(target, json!(1), &mut roots),
                Err(FunctionError::UnrecognizedTarget(_))
            ));
        }
        assert_eq!(roots.context(), &Map::new());

        let err = publish("context.a..b", json!(1), &mut roots).unwrap_err();
        assert!(matches!(err, FunctionError::InvalidPath { raw, .. } if raw == "context.a..b"));
    }
}
