//! Error types for graphfn Core
//!
//! Provides error handling for:
//! - Reference and target parsing (unknown roots, malformed paths)
//! - Reference resolution failures
//! - Result publication conflicts
//! - Input validation and external query failures
//!
//! Every error is terminal for the current invocation. Retries belong to the
//! reconciliation loop that owns the function.

use graphfn_document::DocumentError;

/// Main function error type
#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    /// Malformed path or type conflict inside a document
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Reference prefix is not one of `spec`, `status`, `context`
    #[error("unsupported reference root {root:?} in {reference}")]
    UnsupportedRoot {
        /// Root literal found before the first `.`
        root: String,
        /// Full reference string
        reference: String,
    },

    /// Path after the root of a reference or target does not parse
    #[error("invalid path in {raw}: {source}")]
    InvalidPath {
        /// Reference or target as written
        raw: String,
        /// Underlying path failure
        #[source]
        source: DocumentError,
    },

    /// Target prefix is not one of `status`, `context`, or nothing follows it
    #[error("Unrecognized target field: {0}")]
    UnrecognizedTarget(String),

    /// Reference resolved to nothing usable
    #[error("{0} not found")]
    ReferenceNotFound(String),

    /// Resolving an input reference field failed
    #[error("cannot resolve {field}: {source}")]
    Resolve {
        /// Input field carrying the reference (e.g. `groupsRef`)
        field: &'static str,
        /// Underlying failure
        #[source]
        source: Box<FunctionError>,
    },

    /// Writing the result into its target failed
    #[error("cannot set {target}: {source}")]
    Publish {
        /// Target string
        target: String,
        /// Underlying document failure
        #[source]
        source: DocumentError,
    },

    /// Function input is missing required data
    #[error("{0}")]
    InvalidInput(String),

    /// External query failed
    #[error(transparent)]
    ExternalQuery(#[from] QueryError),
}

impl FunctionError {
    /// Wrap a resolution failure with the input field it came from
    #[inline]
    pub fn resolve(field: &'static str, source: FunctionError) -> Self {
        Self::Resolve {
            field,
            source: Box::new(source),
        }
    }

    /// Wrap a path failure with the reference or target it came from
    #[inline]
    pub fn invalid_path(raw: impl Into<String>, source: DocumentError) -> Self {
        Self::InvalidPath {
            raw: raw.into(),
            source,
        }
    }

    /// Check if the error came from the external query collaborator
    #[inline]
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::ExternalQuery(_))
    }
}

/// Errors reported by a query collaborator
///
/// Collaborator errors are carried opaquely; the function never inspects
/// them beyond reporting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Query type has no handler
    #[error("unsupported query type: {0}")]
    UnsupportedQueryType(String),

    /// The external service rejected or failed the query
    #[error("{0}")]
    Failed(String),

    /// The query was cancelled before completion
    #[error("query cancelled")]
    Cancelled,
}

impl QueryError {
    /// Create failure with message
    #[inline]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors reported by a roots store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Roots could not be fetched
    #[error("cannot fetch roots: {0}")]
    Fetch(String),

    /// Roots could not be persisted
    #[error("cannot persist roots: {0}")]
    Persist(String),
}

/// Result type alias for function operations
pub type FunctionResult<T> = Result<T, FunctionError>;
