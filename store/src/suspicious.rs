//! Suspicious-activity signal source.

use crate::{StoreError, SuspiciousActivityReport};

/// Looks up whether recent activity for an email warrants blocking.
///
/// Must be idempotent: the pipeline calls it exactly once per attempt.
pub trait SuspiciousActivityStore: Send + Sync {
    fn lookup_suspicious_activity(
        &self,
        email: &str,
    ) -> Result<SuspiciousActivityReport, StoreError>;
}
