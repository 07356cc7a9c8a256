//! Function input
//!
//! The input names the query to run, its parameters (given inline or as
//! references into the pipeline documents), and the target the result is
//! written to.

use crate::error::{FunctionError, FunctionResult};
use crate::resolver::{resolve_array, resolve_scalar};
use crate::roots::RootsContext;
use serde::{Deserialize, Serialize};

/// Input document of the function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Input schema version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Input kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Query to run (`UserValidation`, `GroupMembership`, `GroupObjectIDs`,
    /// `ServicePrincipalDetails`)
    #[serde(default)]
    pub query_type: String,

    /// User principal names to validate
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,

    /// Reference to a list of user principal names; overrides `users`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_ref: Option<String>,

    /// Group whose members are listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Reference to the group name; overrides `group`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_ref: Option<String>,

    /// Group names to look up
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    /// Reference to a list of group names; overrides `groups`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups_ref: Option<String>,

    /// Service principal names to look up
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_principals: Vec<String>,

    /// Reference to a list of service principal names; overrides
    /// `servicePrincipals`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_principals_ref: Option<String>,

    /// Where to store the query result (`status.<path>` or `context.<path>`)
    #[serde(default)]
    pub target: String,

    /// Skip the query when the target already holds data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_query_when_target_has_data: Option<bool>,
}

impl Input {
    /// Create input for a query type and target
    #[must_use]
    pub fn new(query_type: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            query_type: query_type.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    /// With inline users
    #[must_use]
    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users = users.into_iter().map(Into::into).collect();
        self
    }

    /// With inline group
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// With inline groups
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// With inline service principal names
    #[must_use]
    pub fn with_service_principals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_principals = names.into_iter().map(Into::into).collect();
        self
    }

    /// With skip flag
    #[must_use]
    pub fn with_skip_when_target_has_data(mut self, skip: bool) -> Self {
        self.skip_query_when_target_has_data = Some(skip);
        self
    }

    /// Effective skip flag, falling back to `default` when unset
    #[inline]
    #[must_use]
    pub fn skip_when_target_has_data(&self, default: bool) -> bool {
        self.skip_query_when_target_has_data.unwrap_or(default)
    }

    /// Substitute every reference field with the value it resolves to
    ///
    /// # Errors
    /// The first resolution failure, wrapped with the name of the reference
    /// field (`cannot resolve groupsRef: ...`).
    pub fn resolve_references(&mut self, roots: &mut RootsContext) -> FunctionResult<()> {
        if let Some(reference) = &self.users_ref {
            self.users = resolve_array(reference, roots)
                .map_err(|e| FunctionError::resolve("usersRef", e))?;
        }
        if let Some(reference) = &self.group_ref {
            let group = resolve_scalar(reference, roots)
                .map_err(|e| FunctionError::resolve("groupRef", e))?;
            self.group = Some(group);
        }
        if let Some(reference) = &self.groups_ref {
            self.groups = resolve_array(reference, roots)
                .map_err(|e| FunctionError::resolve("groupsRef", e))?;
        }
        if let Some(reference) = &self.service_principals_ref {
            self.service_principals = resolve_array(reference, roots)
                .map_err(|e| FunctionError::resolve("servicePrincipalsRef", e))?;
        }
        Ok(())
    }
}
