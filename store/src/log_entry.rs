//! Audit record written once per verification attempt.

use guardiq_types::{AttemptStatus, CallerInfo, Platform, Role, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the caller claimed in this attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptDetails {
    pub role: Role,
    pub platform: Platform,
    pub followers: u64,
}

impl AttemptDetails {
    pub fn new(role: Role, platform: Platform, followers: u64) -> Self {
        Self {
            role,
            platform,
            followers,
        }
    }

    /// Stable textual form `role:platform:followers` consumed by log readers.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttemptDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.role, self.platform, self.followers)
    }
}

/// One audit log row. Built by the pipeline, owned by the store afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationLogEntry {
    /// Normalized (trimmed, lower-cased) email.
    pub email: String,
    pub attempt: AttemptDetails,
    pub status: AttemptStatus,
    pub caller_address: Option<String>,
    pub caller_agent: String,
    pub timestamp: Timestamp,
}

impl VerificationLogEntry {
    pub fn new(
        email: impl Into<String>,
        attempt: AttemptDetails,
        status: AttemptStatus,
        caller: &CallerInfo,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            email: email.into(),
            attempt,
            status,
            caller_address: caller.address.clone(),
            caller_agent: caller.agent.clone(),
            timestamp,
        }
    }

    pub fn encoded_attempt(&self) -> String {
        self.attempt.encode()
    }
}
