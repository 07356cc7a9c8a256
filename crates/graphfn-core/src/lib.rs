//! graphfn Core - directory query pipeline step
//!
//! One invocation:
//! - Seeds the desired composite from the observed one
//! - Resolves input references against `spec`, `status` or `context`
//! - Skips the query when the target already holds data (optional)
//! - Runs the query through a [`GraphQuery`] collaborator
//! - Publishes the result into `status` or `context`
//!
//! # Example
//!
//! ```rust,ignore
//! use graphfn_core::{FunctionRequest, Input, QueryFunction};
//!
//! # async fn example(graph: impl graphfn_core::GraphQuery) {
//! let function = QueryFunction::new(graph);
//!
//! let input = Input::new("GroupObjectIDs", "status.groupObjectIDs")
//!     .with_groups(["Developers", "Operations"]);
//! let response = function.run_function(FunctionRequest::new(input)).await;
//!
//! assert!(!response.outcome.is_fatal());
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod composite;
pub mod config;
pub mod error;
pub mod function;
pub mod input;
pub mod publisher;
pub mod query;
pub mod resolver;
pub mod response;
pub mod roots;

// Re-exports for convenience
pub use composite::Composite;
pub use config::FunctionConfig;
pub use error::{FunctionError, FunctionResult, QueryError, StoreError};
pub use function::{QueryFunction, RootsStore, Stage};
pub use input::Input;
pub use publisher::{publish, publish_to};
pub use query::{DirectoryObject, GraphQuery, QueryRequest, QueryType};
pub use resolver::{resolve_array, resolve_scalar};
pub use response::{
    Condition, ConditionStatus, Event, FunctionRequest, FunctionResponse, Outcome, ResultTarget,
    Severity, SKIPPED_QUERY_MESSAGE,
};
pub use roots::{Reference, RootKind, RootsContext, Target, TargetRoot};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with graphfn Core
    pub use crate::{
        Composite, FunctionConfig, FunctionError, FunctionRequest, FunctionResponse, GraphQuery,
        Input, Outcome, QueryError, QueryFunction, QueryRequest, RootsContext, RootsStore,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
