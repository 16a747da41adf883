//! Append-only audit log of verification attempts.

use crate::{StoreError, VerificationLogEntry};

/// Trait for the audit log.
///
/// Only per-entry integrity is required; ordering across concurrent appends
/// is up to the backend.
pub trait VerificationLogStore: Send + Sync {
    fn append_verification_log(&self, entry: &VerificationLogEntry) -> Result<(), StoreError>;

    /// All entries recorded for an email, oldest first.
    fn entries_for_email(&self, email: &str) -> Result<Vec<VerificationLogEntry>, StoreError>;

    /// Total number of entries in the log.
    fn log_len(&self) -> Result<u64, StoreError>;
}
