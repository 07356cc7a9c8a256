//! graphfn Document Engine
//!
//! Path-addressable access to nested JSON documents.
//!
//! # Core Concepts
//!
//! - [`FieldPath`]: parsed dot/bracket path (`a.[x.y].b` → `a`, `x.y`, `b`)
//! - [`get`] / [`set`]: traversal and sibling-preserving assignment over mappings
//! - [`has_data`]: "already holds meaningful data" classification
//!
//! # Example
//!
//! ```rust,ignore
//! use graphfn_document::{get_in, set, FieldPath, Map};
//! use serde_json::json;
//!
//! let path = FieldPath::parse("[example.org/annotation].value")?;
//! let mut doc = Map::new();
//! set(&mut doc, &path, json!(1))?;
//! assert_eq!(get_in(&doc, &path), Some(&json!(1)));
//! ```

#![warn(unreachable_pub)]

// Core modules
mod document;
mod error;
mod path;
mod presence;

// Re-exports
pub use document::{get, get_in, set};
pub use error::DocumentError;
pub use path::FieldPath;
pub use presence::{has_data, has_data_in, is_present};

/// Re-exported document value types
pub use serde_json::{Map, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
