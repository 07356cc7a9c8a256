//! Query function orchestrator
//!
//! Runs one invocation as a linear sequence of stages:
//!
//! ```text
//! Init -> ResolveRefs -> CheckSkip -> Done (skipped)
//!                                  -> RunQuery -> Publish -> Done
//! ```
//!
//! Any stage may fail; the first error ends the invocation with a fatal
//! outcome. Nothing is retried here.

use crate::composite::Composite;
use crate::config::FunctionConfig;
use crate::error::{FunctionResult, StoreError};
use crate::input::Input;
use crate::publisher::publish_to;
use crate::query::{GraphQuery, QueryRequest};
use crate::response::{
    Condition, Event, FunctionRequest, FunctionResponse, Outcome, SKIPPED_QUERY_MESSAGE,
};
use crate::roots::{RootsContext, Target};
use async_trait::async_trait;
use graphfn_document::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// Invocation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Seed the desired composite
    Init,
    /// Substitute input references and parse the target
    ResolveRefs,
    /// Decide whether the target already holds data
    CheckSkip,
    /// Call the query collaborator
    RunQuery,
    /// Write the result into its target
    Publish,
    /// Finished
    Done,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::ResolveRefs => "resolve-refs",
            Self::CheckSkip => "check-skip",
            Self::RunQuery => "run-query",
            Self::Publish => "publish",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
enum Completion {
    Skipped,
    Published { query_type: String },
}

/// Source and sink of the documents an invocation works on
#[async_trait]
pub trait RootsStore: Send + Sync {
    /// Load the request for the next invocation
    async fn fetch_roots(&self) -> Result<FunctionRequest, StoreError>;

    /// Persist the desired composite and the pipeline context
    async fn persist_roots(
        &self,
        desired: &Composite,
        context: &Map<String, Value>,
    ) -> Result<(), StoreError>;
}

/// Pipeline function that runs a directory query and publishes its result
#[derive(Debug)]
pub struct QueryFunction<Q> {
    /// Query collaborator
    graph: Q,
    /// Configuration
    config: FunctionConfig,
}

impl<Q: GraphQuery> QueryFunction<Q> {
    /// Create function with default configuration
    #[inline]
    #[must_use]
    pub fn new(graph: Q) -> Self {
        Self {
            graph,
            config: FunctionConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: FunctionConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FunctionConfig {
        &self.config
    }

    /// Query collaborator
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &Q {
        &self.graph
    }

    /// Run one invocation
    ///
    /// Never returns an error: failures are reported as a fatal outcome with
    /// a matching event, carrying the desired composite and context as they
    /// stood when the failure occurred.
    pub async fn run_function(&self, request: FunctionRequest) -> FunctionResponse {
        let FunctionRequest {
            observed,
            desired,
            context,
            mut input,
        } = request;

        tracing::info!(
            query_type = %input.query_type,
            target_path = %input.target,
            "running function"
        );

        let mut roots = RootsContext::new(observed, desired, context);
        let mut stage = Stage::Init;
        roots.seed_desired();
        tracing::debug!("seeded desired composite from observed composite");

        let result = self.execute(&mut input, &mut roots, &mut stage).await;
        let (desired, context) = roots.into_parts();

        let mut response = FunctionResponse {
            outcome: Outcome::Success { message: None },
            desired,
            context,
            conditions: Vec::new(),
            events: Vec::new(),
            ttl_secs: self.config.response_ttl_secs,
        };

        match result {
            Ok(Completion::Skipped) => {
                response.outcome = Outcome::Skipped {
                    message: SKIPPED_QUERY_MESSAGE.to_string(),
                };
                response.conditions.push(Condition::skipped());
                response.conditions.push(Condition::success());
            }
            Ok(Completion::Published { query_type }) => {
                response.outcome = Outcome::Success {
                    message: self.config.success_message.clone(),
                };
                response.conditions.push(Condition::success());
                response
                    .events
                    .push(Event::normal(format!("QueryType: \"{query_type}\"")));
            }
            Err(e) => {
                tracing::error!(stage = %stage, error = %e, "function failed");
                let message = e.to_string();
                response.events.push(Event::fatal(message.clone()));
                response.outcome = Outcome::Fatal { message };
            }
        }

        response
    }

    async fn execute(
        &self,
        input: &mut Input,
        roots: &mut RootsContext,
        stage: &mut Stage,
    ) -> FunctionResult<Completion> {
        advance(stage, Stage::ResolveRefs);
        input.resolve_references(roots)?;
        let target = Target::parse(&input.target)?;

        advance(stage, Stage::CheckSkip);
        let skip = input.skip_when_target_has_data(self.config.skip_query_when_target_has_data);
        if skip && roots.has_data_at(&target) {
            tracing::info!(target_path = %target, "target already has data, skipping query");
            advance(stage, Stage::Done);
            return Ok(Completion::Skipped);
        }

        advance(stage, Stage::RunQuery);
        let request = QueryRequest::from_input(input)?;
        let result = match self.graph.query(&request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(query_type = %request.query_type(), error = %e, "query failed");
                return Err(e.into());
            }
        };
        tracing::info!(query_type = %request.query_type(), "query completed");

        advance(stage, Stage::Publish);
        publish_to(&target, result, roots)?;

        advance(stage, Stage::Done);
        Ok(Completion::Published {
            query_type: input.query_type.clone(),
        })
    }

    /// Fetch roots, run one invocation and persist the outcome
    ///
    /// Fatal outcomes are returned without persisting anything.
    ///
    /// # Errors
    /// Store failures while fetching or persisting.
    pub async fn reconcile<S>(&self, store: &S) -> Result<FunctionResponse, StoreError>
    where
        S: RootsStore + ?Sized,
    {
        let request = store.fetch_roots().await?;
        let response = self.run_function(request).await;

        if response.outcome.is_fatal() {
            tracing::warn!("fatal outcome, roots not persisted");
        } else {
            store
                .persist_roots(&response.desired, &response.context)
                .await?;
            tracing::info!("persisted desired composite and context");
        }
        Ok(response)
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::debug!(from = %stage, to = %next, "stage transition");
    *stage = next;
}
