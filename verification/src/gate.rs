//! Suspicious-activity gate, evaluated strictly before classification.

use std::sync::Arc;

use guardiq_store::{StoreError, SuspiciousActivityReport, SuspiciousActivityStore};
use serde::{Deserialize, Serialize};

/// What to do when the signal source cannot be reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateFailurePolicy {
    /// Treat the caller as not blocked and continue to classification.
    #[default]
    FailOpen,
    /// Treat the caller as blocked.
    FailClosed,
}

/// Result of consulting the gate for one attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum GateDecision {
    Clear(SuspiciousActivityReport),
    Flagged(SuspiciousActivityReport),
    /// The lookup failed; `blocked` reflects the configured policy.
    LookupFailed { blocked: bool },
}

impl GateDecision {
    pub fn is_blocked(&self) -> bool {
        match self {
            Self::Clear(_) => false,
            Self::Flagged(_) => true,
            Self::LookupFailed { blocked } => *blocked,
        }
    }

    pub fn report(&self) -> Option<&SuspiciousActivityReport> {
        match self {
            Self::Clear(r) | Self::Flagged(r) => Some(r),
            Self::LookupFailed { .. } => None,
        }
    }
}

pub struct SuspiciousActivityGate {
    source: Arc<dyn SuspiciousActivityStore>,
    on_failure: GateFailurePolicy,
}

impl SuspiciousActivityGate {
    pub fn new(source: Arc<dyn SuspiciousActivityStore>, on_failure: GateFailurePolicy) -> Self {
        Self { source, on_failure }
    }

    pub fn with_policy(self, on_failure: GateFailurePolicy) -> Self {
        Self { on_failure, ..self }
    }

    pub fn failure_policy(&self) -> GateFailurePolicy {
        self.on_failure
    }

    /// Consult the signal source once for `email`.
    pub fn check(&self, email: &str) -> GateDecision {
        match self.source.lookup_suspicious_activity(email) {
            Ok(report) if report.is_suspicious => GateDecision::Flagged(report),
            Ok(report) => GateDecision::Clear(report),
            Err(e) => {
                let blocked = self.on_failure == GateFailurePolicy::FailClosed;
                tracing::warn!(
                    error = %e,
                    policy = ?self.on_failure,
                    blocked,
                    "suspicious-activity lookup failed"
                );
                GateDecision::LookupFailed { blocked }
            }
        }
    }

    /// Raw report for read-only callers; errors are passed through.
    pub fn report(&self, email: &str) -> Result<SuspiciousActivityReport, StoreError> {
        self.source.lookup_suspicious_activity(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardiq_nullables::NullStore;

    #[test]
    fn flagged_report_blocks() {
        let store = Arc::new(NullStore::new());
        store.flag("x@y.com");
        let gate = SuspiciousActivityGate::new(store, GateFailurePolicy::FailOpen);

        let decision = gate.check("x@y.com");
        assert!(decision.is_blocked());
        assert!(matches!(decision, GateDecision::Flagged(_)));
        assert!(!gate.check("other@y.com").is_blocked());
    }

    #[test]
    fn lookup_failure_follows_policy() {
        let store = Arc::new(NullStore::new());
        store.fail_lookups(true);

        let open = SuspiciousActivityGate::new(store.clone(), GateFailurePolicy::FailOpen);
        assert_eq!(
            open.check("x@y.com"),
            GateDecision::LookupFailed { blocked: false }
        );

        let closed = SuspiciousActivityGate::new(store, GateFailurePolicy::FailClosed);
        assert_eq!(
            closed.check("x@y.com"),
            GateDecision::LookupFailed { blocked: true }
        );
        assert!(closed.check("x@y.com").report().is_none());
    }

    #[test]
    fn policy_parses_from_kebab_case() {
        let p: GateFailurePolicy = serde_json::from_str("\"fail-closed\"").unwrap();
        assert_eq!(p, GateFailurePolicy::FailClosed);
    }
}
