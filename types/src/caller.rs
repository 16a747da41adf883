//! Network-level context about whoever submitted a request.

use serde::{Deserialize, Serialize};

/// Caller details captured by the transport layer for the audit trail.
///
/// Carries no identity or credentials.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerInfo {
    /// Remote address, when the transport exposes one.
    pub address: Option<String>,
    /// `User-Agent` header value, empty when absent.
    pub agent: String,
}

impl CallerInfo {
    pub fn new(address: Option<String>, agent: impl Into<String>) -> Self {
        Self {
            address,
            agent: agent.into(),
        }
    }
}
