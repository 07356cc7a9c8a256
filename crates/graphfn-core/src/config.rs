//! Function configuration

use serde::{Deserialize, Serialize};

/// Configuration of a [`QueryFunction`](crate::QueryFunction)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FunctionConfig {
    /// Skip flag used when the input does not set one
    pub skip_query_when_target_has_data: bool,
    /// Time-to-live of a response, in seconds
    pub response_ttl_secs: u64,
    /// Informational message attached to successful outcomes
    pub success_message: Option<String>,
}

impl FunctionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default skip flag
    #[inline]
    #[must_use]
    pub fn with_skip_query_when_target_has_data(mut self, skip: bool) -> Self {
        self.skip_query_when_target_has_data = skip;
        self
    }

    /// With response TTL
    #[inline]
    #[must_use]
    pub fn with_response_ttl_secs(mut self, secs: u64) -> Self {
        self.response_ttl_secs = secs;
        self
    }

    /// With success message
    #[inline]
    #[must_use]
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            skip_query_when_target_has_data: false,
            response_ttl_secs: 60,
            success_message: None,
        }
    }
}
