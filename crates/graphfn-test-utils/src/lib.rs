//! Testing utilities for graphfn workspace
//!
//! Shared fixtures, a recording in-memory directory and an in-memory roots
//! store.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use async_trait::async_trait;
use graphfn_core::{
    Composite, DirectoryObject, FunctionRequest, GraphQuery, Input, QueryError, QueryRequest,
    RootsStore, StoreError,
};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};

pub fn composite(value: Value) -> Composite {
    serde_json::from_value(value).unwrap()
}

pub fn context(value: Value) -> Map<String, Value> {
    serde_json::from_value(value).unwrap()
}

/// Observed composite without status
pub fn observed_xr() -> Composite {
    composite(json!({
        "apiVersion": "example.org/v1",
        "kind": "XR",
        "metadata": {"name": "cool-xr"},
        "spec": {"count": 2}
    }))
}

/// Observed composite carrying `status`
pub fn observed_xr_with_status(status: Value) -> Composite {
    composite(json!({
        "apiVersion": "example.org/v1",
        "kind": "XR",
        "metadata": {"name": "cool-xr"},
        "spec": {"count": 2},
        "status": status
    }))
}

pub fn request(input: Input, observed: Composite) -> FunctionRequest {
    FunctionRequest::new(input).with_observed(observed)
}

#[derive(Debug, Clone)]
struct Group {
    object: DirectoryObject,
    members: Vec<DirectoryObject>,
}

/// In-memory directory answering [`QueryRequest`]s
///
/// Records every request it receives.
#[derive(Debug, Default)]
pub struct StaticGraphQuery {
    users: Vec<DirectoryObject>,
    groups: Vec<Group>,
    service_principals: Vec<DirectoryObject>,
    failure: Option<QueryError>,
    calls: Mutex<Vec<QueryRequest>>,
}

impl StaticGraphQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory with three groups, one user and one service principal
    ///
    /// `Developers` (`group-id-1`) holds the user and the service principal.
    pub fn sample() -> Self {
        let user = sample_user();
        let sp = sample_service_principal();
        Self::new()
            .with_user(user.clone())
            .with_service_principal(sp.clone())
            .with_group("group-id-1", "Developers", "Development team", vec![user, sp])
            .with_group("group-id-2", "Operations", "Operations team", Vec::new())
            .with_group("group-id-3", "All Company", "All company group", Vec::new())
    }

    /// Directory that fails every query
    pub fn failing(error: QueryError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: DirectoryObject) -> Self {
        self.users.push(user);
        self
    }

    #[must_use]
    pub fn with_service_principal(mut self, sp: DirectoryObject) -> Self {
        self.service_principals.push(sp);
        self
    }

    #[must_use]
    pub fn with_group(
        mut self,
        id: &str,
        name: &str,
        description: &str,
        members: Vec<DirectoryObject>,
    ) -> Self {
        self.groups.push(Group {
            object: DirectoryObject::Group {
                id: id.to_string(),
                display_name: Some(name.to_string()),
                description: Some(description.to_string()),
            },
            members,
        });
        self
    }

    pub fn calls(&self) -> Vec<QueryRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn find_group(&self, name: &str) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.object.display_name() == name)
    }

    fn answer(&self, request: &QueryRequest) -> Result<Value, QueryError> {
        let records: Vec<Value> = match request {
            QueryRequest::UserValidation { users } => users
                .iter()
                .flat_map(|upn| {
                    self.users.iter().filter(move |u| {
                        matches!(u, DirectoryObject::User { user_principal_name: Some(n), .. } if n == upn)
                    })
                })
                .map(|u| u.clone().into_record_value())
                .collect(),
            QueryRequest::GroupMembership { group } => {
                let group = self
                    .find_group(group)
                    .ok_or_else(|| QueryError::failed(format!("group not found: {group}")))?;
                group
                    .members
                    .iter()
                    .map(|m| m.clone().into_member_value())
                    .collect()
            }
            QueryRequest::GroupObjectIds { groups } => groups
                .iter()
                .filter_map(|name| self.find_group(name))
                .map(|g| g.object.clone().into_record_value())
                .collect(),
            QueryRequest::ServicePrincipalDetails { names } => names
                .iter()
                .flat_map(|name| {
                    self.service_principals
                        .iter()
                        .filter(move |sp| sp.display_name() == *name)
                })
                .map(|sp| sp.clone().into_record_value())
                .collect(),
        };
        Ok(Value::Array(records))
    }
}

#[async_trait]
impl GraphQuery for StaticGraphQuery {
    async fn query(&self, request: &QueryRequest) -> Result<Value, QueryError> {
        self.calls.lock().push(request.clone());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.answer(request)
    }
}

/// User as the directory reports it, classified from its properties
pub fn sample_user() -> DirectoryObject {
    DirectoryObject::classify(
        "user-id-1",
        context(json!({
            "displayName": "Test User 1",
            "mail": "user1@example.com",
            "userPrincipalName": "user1@example.com"
        })),
    )
}

/// Service principal as the directory reports it, classified by `appId`
pub fn sample_service_principal() -> DirectoryObject {
    DirectoryObject::classify(
        "sp-id-1",
        context(json!({
            "displayName": "Test Service Principal",
            "appId": "sp-app-id-1"
        })),
    )
}

/// [`RootsStore`] keeping one request and the last persisted roots in memory
#[derive(Debug, Default)]
pub struct InMemoryRootsStore {
    request: Mutex<FunctionRequest>,
    persisted: Mutex<Option<(Composite, Map<String, Value>)>>,
}

impl InMemoryRootsStore {
    pub fn new(request: FunctionRequest) -> Self {
        Self {
            request: Mutex::new(request),
            persisted: Mutex::new(None),
        }
    }

    pub fn persisted(&self) -> Option<(Composite, Map<String, Value>)> {
        self.persisted.lock().clone()
    }
}

#[async_trait]
impl RootsStore for InMemoryRootsStore {
    async fn fetch_roots(&self) -> Result<FunctionRequest, StoreError> {
        Ok(self.request.lock().clone())
    }

    async fn persist_roots(
        &self,
        desired: &Composite,
        context: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        *self.persisted.lock() = Some((desired.clone(), context.clone()));
        Ok(())
    }
}
