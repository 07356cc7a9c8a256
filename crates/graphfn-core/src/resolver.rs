//! Reference resolution
//!
//! Reads a string or a list of strings from the root a reference names.
//! Anything that does not resolve to the expected shape is reported as
//! [`FunctionError::ReferenceNotFound`].

use crate::error::{FunctionError, FunctionResult};
use crate::roots::{Reference, RootsContext};
use graphfn_document::{get_in, Value};

/// Locate the value a reference points at
fn lookup<'a>(reference: &Reference, roots: &'a mut RootsContext) -> Option<&'a Value> {
    let document = roots.document(reference.root())?;
    get_in(document, reference.path())
}

/// Resolve a reference to a string value
///
/// # Errors
/// Parsing errors for the reference itself, or
/// [`FunctionError::ReferenceNotFound`] when the value is missing or not a
/// string.
pub fn resolve_scalar(reference: &str, roots: &mut RootsContext) -> FunctionResult<String> {
    let reference = Reference::parse(reference)?;
    match lookup(&reference, roots) {
        Some(Value::String(value)) => {
            tracing::debug!(reference = %reference, "resolved scalar reference");
            Ok(value.clone())
        }
        _ => Err(FunctionError::ReferenceNotFound(reference.to_string())),
    }
}

/// Resolve a reference to a list of strings
///
/// Non-string elements are dropped. A list with no strings left is treated
/// as unresolved rather than as an empty success.
///
/// # Errors
/// Parsing errors for the reference itself, or
/// [`FunctionError::ReferenceNotFound`] when the value is missing, not an
/// array, or holds no strings.
pub fn resolve_array(reference: &str, roots: &mut RootsContext) -> FunctionResult<Vec<String>> {
    let reference = Reference::parse(reference)?;
    let values: Vec<String> = match lookup(&reference, roots) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    if values.is_empty() {
        return Err(FunctionError::ReferenceNotFound(reference.to_string()));
    }

    tracing::debug!(reference = %reference, count = values.len(), "resolved array reference");
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::Composite;
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

    fn not_found(result: FunctionResult<impl std::fmt::Debug>) -> String {
        match result {
            Err(FunctionError::ReferenceNotFound(reference)) => reference,
            other => panic!("expected ReferenceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn scalar_from_status_falls_back_to_observed() {
        let mut roots = roots(
            json!({"status": {"azResourceGraphQuery": "Q"}}),
            json!({}),
            json!({}),
        );
        assert_eq!(resolve_scalar("status.azResourceGraphQuery", &mut roots).unwrap(), "Q");
    }

    #[test]
    fn scalar_from_status_prefers_desired() {
        let mut roots = roots(
            json!({"status": {"groupInfo": {"name": "Observed"}}}),
            json!({"status": {"groupInfo": {"name": "Desired"}}}),
            json!({}),
        );
        assert_eq!(resolve_scalar("status.groupInfo.name", &mut roots).unwrap(), "Desired");
    }

    #[test]
    fn scalar_from_context() {
        let mut roots = roots(
            json!({}),
            json!({}),
            json!({"groupInfo": {"name": "Developers"}, "[odd]": 1, "a.b": {"c": "dotted"}}),
        );
        assert_eq!(resolve_scalar("context.groupInfo.name", &mut roots).unwrap(), "Developers");
        assert_eq!(resolve_scalar("context.[a.b].c", &mut roots).unwrap(), "dotted");
    }

    #[test]
    fn scalar_from_spec_copies_spec_down() {
        let mut roots = roots(json!({"spec": {"groupName": "Ops"}}), json!({}), json!({}));
        assert_eq!(resolve_scalar("spec.groupName", &mut roots).unwrap(), "Ops");
        assert_eq!(roots.desired().spec().unwrap()["groupName"], json!("Ops"));
    }

    #[test]
    fn scalar_from_spec_with_partial_desired_spec() {
        let mut roots = roots(
            json!({"spec": {"groupName": "Ops"}}),
            json!({"spec": {"edited": "yes"}}),
            json!({}),
        );
        assert_eq!(resolve_scalar("spec.groupName", &mut roots).unwrap(), "Ops");
        assert_eq!(resolve_scalar("spec.edited", &mut roots).unwrap(), "yes");
    }

    #[test]
    fn scalar_wrong_type_is_not_found() {
        let mut roots = roots(json!({}), json!({}), json!({"count": 2, "list": ["a"], "obj": {}}));
        assert_eq!(not_found(resolve_scalar("context.count", &mut roots)), "context.count");
        assert_eq!(not_found(resolve_scalar("context.list", &mut roots)), "context.list");
        assert_eq!(not_found(resolve_scalar("context.obj", &mut roots)), "context.obj");
        assert_eq!(
            not_found(resolve_scalar("context.nonexistent.value", &mut roots)),
            "context.nonexistent.value"
        );
    }

    #[test]
    fn scalar_unknown_root() {
        let mut roots = RootsContext::default();
        assert!(matches!(
            resolve_scalar("observed.name", &mut roots),
            Err(FunctionError::UnsupportedRoot { .. })
        ));
    }

    #[test]
    fn scalar_missing_status_everywhere() {
        let mut roots = RootsContext::new(Composite::new(), Composite::new(), Map::new());
        assert_eq!(not_found(resolve_scalar("status.name", &mut roots)), "status.name");
    }

    #[test]
    fn array_from_status() {
        let mut roots = roots(
            json!({"status": {"groups": ["Developers", "Operations", "All Company"]}}),
            json!({}),
            json!({}),
        );
        assert_eq!(
            resolve_array("status.groups", &mut roots).unwrap(),
            vec!["Developers", "Operations", "All Company"]
        );
    }

    #[test]
    fn array_drops_non_strings() {
        let mut roots = roots(json!({}), json!({}), json!({"mixed": ["a", 1, null, {"b": 2}, "c"]}));
        assert_eq!(resolve_array("context.mixed", &mut roots).unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn array_with_no_strings_is_not_found() {
        let mut roots = roots(
            json!({}),
            json!({}),
            json!({"empty": [], "numbers": [1, 2], "scalar": "a"}),
        );
        assert_eq!(not_found(resolve_array("context.empty", &mut roots)), "context.empty");
        assert_eq!(not_found(resolve_array("context.numbers", &mut roots)), "context.numbers");
        assert_eq!(not_found(resolve_array("context.scalar", &mut roots)), "context.scalar");
        assert_eq!(not_found(resolve_array("context.missing", &mut roots)), "context.missing");
    }
}
