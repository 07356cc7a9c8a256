//! Directory queries
//!
//! [`QueryRequest`] is the typed descriptor handed to a [`GraphQuery`]
//! collaborator. [`DirectoryObject`] models the objects a directory returns
//! and renders them into the record documents stored at the target.

use crate::error::{FunctionError, FunctionResult, QueryError};
use crate::input::Input;
use async_trait::async_trait;
use graphfn_document::{Map, Value};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Supported query types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Check that user principal names exist
    UserValidation,
    /// List the members of one group
    GroupMembership,
    /// Look up object IDs of groups by display name
    GroupObjectIds,
    /// Look up service principals by display name
    ServicePrincipalDetails,
}

impl QueryType {
    /// Name as written in the input `queryType` field
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserValidation => "UserValidation",
            Self::GroupMembership => "GroupMembership",
            Self::GroupObjectIds => "GroupObjectIDs",
            Self::ServicePrincipalDetails => "ServicePrincipalDetails",
        }
    }
}

impl Display for QueryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UserValidation" => Ok(Self::UserValidation),
            "GroupMembership" => Ok(Self::GroupMembership),
            "GroupObjectIDs" => Ok(Self::GroupObjectIds),
            "ServicePrincipalDetails" => Ok(Self::ServicePrincipalDetails),
            other => Err(QueryError::UnsupportedQueryType(other.to_string())),
        }
    }
}

/// Validated query descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRequest {
    /// Validate user principal names
    UserValidation {
        /// User principal names
        users: Vec<String>,
    },
    /// List group members
    GroupMembership {
        /// Group display name
        group: String,
    },
    /// Resolve group object IDs
    GroupObjectIds {
        /// Group display names
        groups: Vec<String>,
    },
    /// Resolve service principals
    ServicePrincipalDetails {
        /// Service principal display names
        names: Vec<String>,
    },
}

impl QueryRequest {
    /// Build the descriptor for an input whose references are resolved
    ///
    /// # Errors
    /// [`FunctionError::InvalidInput`] for an unknown query type or when the
    /// parameters the query type needs are missing.
    pub fn from_input(input: &Input) -> FunctionResult<Self> {
        let query_type: QueryType = input
            .query_type
            .parse()
            .map_err(|e: QueryError| FunctionError::InvalidInput(e.to_string()))?;

        let require = |values: &[String], message: &str| {
            if values.is_empty() {
                Err(FunctionError::InvalidInput(message.to_string()))
            } else {
                Ok(values.to_vec())
            }
        };

        match query_type {
            QueryType::UserValidation => Ok(Self::UserValidation {
                users: require(&input.users, "no users provided for validation")?,
            }),
            QueryType::GroupMembership => match input.group.as_deref() {
                Some(group) if !group.is_empty() => Ok(Self::GroupMembership {
                    group: group.to_string(),
                }),
                _ => Err(FunctionError::InvalidInput(
                    "no group name provided".to_string(),
                )),
            },
            QueryType::GroupObjectIds => Ok(Self::GroupObjectIds {
                groups: require(&input.groups, "no group names provided")?,
            }),
            QueryType::ServicePrincipalDetails => Ok(Self::ServicePrincipalDetails {
                names: require(
                    &input.service_principals,
                    "no service principal names provided",
                )?,
            }),
        }
    }

    /// Query type of this request
    #[must_use]
    pub fn query_type(&self) -> QueryType {
        match self {
            Self::UserValidation { .. } => QueryType::UserValidation,
            Self::GroupMembership { .. } => QueryType::GroupMembership,
            Self::GroupObjectIds { .. } => QueryType::GroupObjectIds,
            Self::ServicePrincipalDetails { .. } => QueryType::ServicePrincipalDetails,
        }
    }
}

/// External directory query collaborator
///
/// Implementations own transport, credentials and retries. The returned
/// value is stored at the target as is.
#[async_trait]
pub trait GraphQuery: Send + Sync {
    /// Execute a query and return its result document
    async fn query(&self, request: &QueryRequest) -> Result<Value, QueryError>;
}

#[async_trait]
impl<T: GraphQuery + ?Sized> GraphQuery for Arc<T> {
    async fn query(&self, request: &QueryRequest) -> Result<Value, QueryError> {
        (**self).query(request).await
    }
}

/// Object returned by a directory
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryObject {
    /// User account
    User {
        /// Object ID
        id: String,
        /// Display name
        display_name: Option<String>,
        /// Mail address
        mail: Option<String>,
        /// User principal name
        user_principal_name: Option<String>,
    },
    /// Application identity
    ServicePrincipal {
        /// Object ID
        id: String,
        /// Display name
        display_name: Option<String>,
        /// Application ID
        app_id: Option<String>,
        /// Description
        description: Option<String>,
    },
    /// Group
    Group {
        /// Object ID
        id: String,
        /// Display name
        display_name: Option<String>,
        /// Description
        description: Option<String>,
    },
    /// Object of a type the directory did not report
    Unknown {
        /// Object ID
        id: String,
        /// Untyped properties
        additional_data: Map<String, Value>,
    },
}

fn string_field(data: &Map<String, Value>, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_string)
}

impl DirectoryObject {
    /// Classify an untyped object from its properties
    ///
    /// `appId` marks a service principal; `mail` or `userPrincipalName` mark
    /// a user. Anything else stays [`DirectoryObject::Unknown`].
    #[must_use]
    pub fn classify(id: impl Into<String>, additional_data: Map<String, Value>) -> Self {
        let id = id.into();
        if additional_data.get("appId").is_some_and(Value::is_string) {
            return Self::ServicePrincipal {
                display_name: string_field(&additional_data, "displayName"),
                app_id: string_field(&additional_data, "appId"),
                description: string_field(&additional_data, "description"),
                id,
            };
        }
        let mail = string_field(&additional_data, "mail");
        let user_principal_name = string_field(&additional_data, "userPrincipalName");
        if mail.is_some() || user_principal_name.is_some() {
            return Self::User {
                display_name: string_field(&additional_data, "displayName"),
                id,
                mail,
                user_principal_name,
            };
        }
        Self::Unknown {
            id,
            additional_data,
        }
    }

    /// Object ID
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::User { id, .. }
            | Self::ServicePrincipal { id, .. }
            | Self::Group { id, .. }
            | Self::Unknown { id, .. } => id,
        }
    }

    /// Member type tag (`user`, `servicePrincipal`, `group`, `unknown`)
    #[must_use]
    pub fn member_type(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::ServicePrincipal { .. } => "servicePrincipal",
            Self::Group { .. } => "group",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Display name, or `Member <id>` when the object carries none
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = match self {
            Self::User { display_name, .. }
            | Self::ServicePrincipal { display_name, .. }
            | Self::Group { display_name, .. } => display_name.clone(),
            Self::Unknown {
                additional_data, ..
            } => string_field(additional_data, "displayName"),
        };
        name.unwrap_or_else(|| format!("Member {}", self.id()))
    }

    /// Render as a group member record
    ///
    /// `{id, type, displayName}` plus `mail`/`userPrincipalName` for users and
    /// `appId` for service principals, each only when known.
    #[must_use]
    pub fn into_member_value(self) -> Value {
        let mut record = Map::new();
        record.insert("id".into(), Value::String(self.id().to_string()));
        record.insert("type".into(), Value::String(self.member_type().to_string()));
        record.insert("displayName".into(), Value::String(self.display_name()));

        match self {
            Self::User {
                mail,
                user_principal_name,
                ..
            } => {
                insert_some(&mut record, "mail", mail);
                insert_some(&mut record, "userPrincipalName", user_principal_name);
            }
            Self::ServicePrincipal { app_id, .. } => {
                insert_some(&mut record, "appId", app_id);
            }
            Self::Group { .. } | Self::Unknown { .. } => {}
        }
        Value::Object(record)
    }

    /// Render as a lookup record
    ///
    /// Lookup queries report every selected field, `null` when unknown:
    /// users `{id, displayName, userPrincipalName, mail}`, groups
    /// `{id, displayName, description}`, service principals
    /// `{id, appId, displayName, description}`. Unknown objects render as
    /// member records.
    #[must_use]
    pub fn into_record_value(self) -> Value {
        let opt = |v: Option<String>| v.map_or(Value::Null, Value::String);
        match self {
            Self::User {
                id,
                display_name,
                mail,
                user_principal_name,
            } => serde_json::json!({
                "id": id,
                "displayName": opt(display_name),
                "userPrincipalName": opt(user_principal_name),
                "mail": opt(mail),
            }),
            Self::Group {
                id,
                display_name,
                description,
            } => serde_json::json!({
                "id": id,
                "displayName": opt(display_name),
                "description": opt(description),
            }),
            Self::ServicePrincipal {
                id,
                display_name,
                app_id,
                description,
            } => serde_json::json!({
                "id": id,
                "appId": opt(app_id),
                "displayName": opt(display_name),
                "description": opt(description),
            }),
            unknown @ Self::Unknown { .. } => unknown.into_member_value(),
        }
    }
}

fn insert_some(record: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        record.insert(key.to_string(), Value::String(value));
    }
}
