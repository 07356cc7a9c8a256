//! Function request and response model

use crate::composite::Composite;
use crate::input::Input;
use graphfn_document::{Map, Value};
use serde::{Deserialize, Serialize};

/// Message attached to the skip condition
pub const SKIPPED_QUERY_MESSAGE: &str = "Target already has data, skipped query to avoid throttling";

/// One invocation's worth of input documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRequest {
    /// Observed composite
    #[serde(default)]
    pub observed: Composite,
    /// Desired composite accumulated by earlier pipeline steps
    #[serde(default)]
    pub desired: Composite,
    /// Shared pipeline context
    #[serde(default)]
    pub context: Map<String, Value>,
    /// Function input
    #[serde(default)]
    pub input: Input,
}

impl FunctionRequest {
    /// Create request from input with empty documents
    #[must_use]
    pub fn new(input: Input) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    /// With observed composite
    #[must_use]
    pub fn with_observed(mut self, observed: Composite) -> Self {
        self.observed = observed;
        self
    }

    /// With desired composite
    #[must_use]
    pub fn with_desired(mut self, desired: Composite) -> Self {
        self.desired = desired;
        self
    }

    /// With pipeline context
    #[must_use]
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = context;
        self
    }
}

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum Outcome {
    /// Query ran and its result was published
    Success {
        /// Optional informational message
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Target already held data, no query ran
    Skipped {
        /// Reason for skipping
        message: String,
    },
    /// Invocation failed
    Fatal {
        /// Error message
        message: String,
    },
}

impl Outcome {
    /// Check if the invocation failed
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    /// Check if the query was skipped
    #[inline]
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Resources a condition or event is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultTarget {
    /// The composite only
    Composite,
    /// The composite and its claim
    CompositeAndClaim,
}

/// Condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    /// Condition holds
    True,
}

/// Status condition reported on the composite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition type (e.g. `FunctionSuccess`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Condition status
    pub status: ConditionStatus,
    /// Machine-readable reason
    pub reason: String,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Resources the condition is attached to
    pub target: ResultTarget,
}

impl Condition {
    /// Create true condition targeting composite and claim
    #[must_use]
    pub fn true_for(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            status: ConditionStatus::True,
            reason: reason.into(),
            message: None,
            target: ResultTarget::CompositeAndClaim,
        }
    }

    /// With message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// `FunctionSuccess` / `Success`
    #[must_use]
    pub fn success() -> Self {
        Self::true_for("FunctionSuccess", "Success")
    }

    /// `FunctionSkip` / `SkippedQuery`
    #[must_use]
    pub fn skipped() -> Self {
        Self::true_for("FunctionSkip", "SkippedQuery").with_message(SKIPPED_QUERY_MESSAGE)
    }
}

/// Event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Informational
    Normal,
    /// Invocation failed
    Fatal,
}

/// Event emitted for the composite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Severity
    pub severity: Severity,
    /// Message
    pub message: String,
    /// Resources the event is attached to
    pub target: ResultTarget,
}

impl Event {
    /// Normal event for the composite
    #[must_use]
    pub fn normal(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Normal,
            message: message.into(),
            target: ResultTarget::Composite,
        }
    }

    /// Fatal event for the composite
    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            message: message.into(),
            target: ResultTarget::Composite,
        }
    }
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    /// How the invocation ended
    pub outcome: Outcome,
    /// Desired composite to persist
    pub desired: Composite,
    /// Pipeline context to persist
    pub context: Map<String, Value>,
    /// Conditions to report
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Events to report
    #[serde(default)]
    pub events: Vec<Event>,
    /// Response time-to-live, in seconds
    pub ttl_secs: u64,
}

impl FunctionResponse {
    /// Fatal message, if the invocation failed
    #[must_use]
    pub fn fatal_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Fatal { message } => Some(message),
            _ => None,
        }
    }

    /// Check if a condition of the given type was reported
    #[must_use]
    pub fn has_condition(&self, kind: &str) -> bool {
        self.conditions.iter().any(|c| c.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_serializes_tagged() {
        let outcome = Outcome::Skipped {
            message: SKIPPED_QUERY_MESSAGE.to_string(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"result": "skipped", "message": SKIPPED_QUERY_MESSAGE})
        );
        assert!(outcome.is_skipped());
        assert!(!outcome.is_fatal());

        let success = Outcome::Success { message: None };
        assert_eq!(serde_json::to_value(&success).unwrap(), json!({"result": "success"}));
    }

    #[test]
    fn skip_condition() {
        let condition = Condition::skipped();
        assert_eq!(condition.kind, "FunctionSkip");
        assert_eq!(condition.reason, "SkippedQuery");
        assert_eq!(condition.message.as_deref(), Some(SKIPPED_QUERY_MESSAGE));
        assert_eq!(condition.target, ResultTarget::CompositeAndClaim);
    }

    #[test]
    fn request_from_document() {
        let request: FunctionRequest = serde_json::from_value(json!({
            "observed": {"kind": "XR"},
            "input": {"queryType": "UserValidation", "users": ["a@b"], "target": "status.users"}
        }))
        .unwrap();
        assert_eq!(request.observed.kind(), "XR");
        assert!(request.context.is_empty());
        assert_eq!(request.input.users, vec!["a@b"]);
    }
}
