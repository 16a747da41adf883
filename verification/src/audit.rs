//! Audit logging of terminal outcomes.

use std::sync::Arc;

use guardiq_store::{StoreError, VerificationLogEntry, VerificationLogStore};

/// Appends one entry per attempt. Failures are reported, never escalated.
pub struct AuditLogger {
    log: Arc<dyn VerificationLogStore>,
}

impl AuditLogger {
    pub fn new(log: Arc<dyn VerificationLogStore>) -> Self {
        Self { log }
    }

    pub fn record(&self, entry: &VerificationLogEntry) -> Result<(), StoreError> {
        self.log.append_verification_log(entry).inspect_err(|e| {
            tracing::warn!(
                error = %e,
                status = %entry.status,
                attempt = %entry.attempt,
                "failed to append verification log entry"
            );
        })
    }
}
