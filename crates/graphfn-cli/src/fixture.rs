//! Query collaborator backed by a results file

use async_trait::async_trait;
use graphfn_core::{GraphQuery, QueryError, QueryRequest};
use graphfn_document::{Map, Value};

/// Answers each query type with a fixed result
///
/// The results document maps a `queryType` name to the value that query
/// returns. Query types without an entry are reported as unsupported.
#[derive(Debug, Clone, Default)]
pub struct FixtureGraphQuery {
    results: Map<String, Value>,
}

impl FixtureGraphQuery {
    /// Create from a results mapping
    #[must_use]
    pub fn new(results: Map<String, Value>) -> Self {
        Self { results }
    }
}

#[async_trait]
impl GraphQuery for FixtureGraphQuery {
    async fn query(&self, request: &QueryRequest) -> Result<Value, QueryError> {
        let query_type = request.query_type();
        tracing::debug!(query_type = %query_type, "answering query from fixture");
        self.results
            .get(query_type.as_str())
            .cloned()
            .ok_or_else(|| QueryError::UnsupportedQueryType(query_type.to_string()))
    }
}
