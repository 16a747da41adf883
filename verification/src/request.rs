//! Normalized verification request.

use guardiq_store::AttemptDetails;
use guardiq_types::{Platform, Role};
use serde::Serialize;

/// A validated request. Only [`crate::RequestValidator`] produces these from
/// raw input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub full_name: String,
    /// Trimmed and lower-cased.
    pub email: String,
    pub role: Role,
    pub platform: Platform,
    pub followers: u64,
}

impl VerificationRequest {
    /// The claim as it is recorded in the audit log.
    pub fn attempt(&self) -> AttemptDetails {
        AttemptDetails::new(self.role, self.platform, self.followers)
    }
}
