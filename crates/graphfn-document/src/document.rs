//! Get/set access over nested JSON mappings
//!
//! Paths only ever descend through mappings. Arrays and scalars are leaves:
//! they can be read or replaced, never traversed into.

use crate::error::DocumentError;
use crate::path::FieldPath;
use serde_json::{Map, Value};

/// Look up the value stored at `path`
///
/// Returns `None` when an intermediate value is not a mapping or a key is
/// missing. Absence is not an error.
#[must_use]
pub fn get<'a>(doc: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    match doc {
        Value::Object(map) => get_in(map, path),
        _ => None,
    }
}

/// Look up the value stored at `path` below a top-level mapping
#[must_use]
pub fn get_in<'a>(map: &'a Map<String, Value>, path: &FieldPath) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    rest.iter()
        .try_fold(map.get(first)?, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            _ => None,
        })
}

/// Assign `value` at `path`, creating missing intermediate mappings
///
/// The leaf is replaced wholesale; sibling keys at every level are left alone.
///
/// # Errors
/// Returns [`DocumentError::TypeConflict`] when an intermediate key holds a
/// non-mapping value. Conflicts are detected before any mapping is created,
/// so a failed call leaves `doc` unchanged.
pub fn set(doc: &mut Map<String, Value>, path: &FieldPath, value: Value) -> Result<(), DocumentError> {
    let Some((last, parents)) = path.split_last() else {
        return Err(DocumentError::invalid_path(path.to_string(), "path has no segments"));
    };

    let mut current = doc;
    for segment in parents {
        let next = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match next {
            Value::Object(map) => map,
            _ => {
                return Err(DocumentError::TypeConflict {
                    key: segment.clone(),
                })
            }
        };
    }

    current.insert(last.clone(), value);
    Ok(())
}
