//! "Already has data" classification used for idempotent skip decisions
//!
//! Only missing keys, `null`, and empty mappings, arrays or strings count as
//! "no data yet". Numbers and booleans are always data: `0` and `false` are
//! observed values, not absence.

use crate::document;
use crate::path::FieldPath;
use serde_json::{Map, Value};

/// Whether a found value counts as meaningful data
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Whether `doc` holds meaningful data at `path`
#[must_use]
pub fn has_data(doc: &Value, path: &FieldPath) -> bool {
    document::get(doc, path).is_some_and(is_present)
}

/// Whether a top-level mapping holds meaningful data at `path`
#[must_use]
pub fn has_data_in(map: &Map<String, Value>, path: &FieldPath) -> bool {
    document::get_in(map, path).is_some_and(is_present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(value: Value) -> bool {
        let doc = json!({"target": value});
        has_data(&doc, &FieldPath::parse("target").unwrap())
    }

    #[test]
    fn absent_or_empty_is_not_data() {
        let doc = json!({});
        assert!(!has_data(&doc, &FieldPath::parse("target").unwrap()));
        assert!(!check(Value::Null));
        assert!(!check(json!({})));
        assert!(!check(json!([])));
        assert!(!check(json!("")));
    }

    #[test]
    fn scalars_and_filled_containers_are_data() {
        assert!(check(json!(0)));
        assert!(check(json!(0.0)));
        assert!(check(json!(false)));
        assert!(check(json!("x")));
        assert!(check(json!({"k": 1})));
        assert!(check(json!([1])));
        assert!(check(json!([null])));
    }

    #[test]
    fn nested_target() {
        let doc = json!({"status": {"groupMembers": [{"id": "1"}]}});
        assert!(has_data(&doc, &FieldPath::parse("status.groupMembers").unwrap()));
        assert!(!has_data(&doc, &FieldPath::parse("status.groupMembers.id").unwrap()));
    }
}
