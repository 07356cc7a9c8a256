//! Error types for path parsing and document access

/// Errors raised while parsing paths or writing into documents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// Path string does not follow the dot/bracket grammar
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The offending path string
        path: String,
        /// What the parser tripped over
        reason: &'static str,
    },

    /// Attempted to descend through a value that is not a mapping
    #[error("key {key:?} exists but is not a map")]
    TypeConflict {
        /// Segment whose value blocked the descent
        key: String,
    },
}

impl DocumentError {
    /// Create invalid path error
    pub(crate) fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }
}
