//! Verification pipeline: wires validation, gate, classifier and audit log
//! into one request/response cycle.
//!
//! Stages: `Validating → Gating → Classifying → Logging → Done`.
//! A blocked caller skips `Classifying`; a validation failure ends the run
//! before `Logging`, so nothing is recorded for malformed requests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use guardiq_store::{
    AggregateStatistics, StatisticsStore, StoreError, SuspiciousActivityReport,
    SuspiciousActivityStore, VerificationLogEntry, VerificationLogStore,
};
use guardiq_types::{AttemptStatus, CallerInfo, Clock};
use guardiq_utils::StatsCounter;
use serde_json::Value;

use crate::{
    AuditLogger, Classifier, GateDecision, GateFailurePolicy, RequestValidator, SecurityStatus,
    SecurityStatusAggregator, SuspiciousActivityGate, TierClassifier, ValidationError,
    VerificationError, VerificationOutcome, VerificationRequest,
};

pub const COUNTER_VERIFIED: &str = "verified";
pub const COUNTER_REJECTED: &str = "rejected";
pub const COUNTER_BLOCKED: &str = "blocked";
pub const COUNTER_VALIDATION_ERRORS: &str = "validation_errors";
pub const COUNTER_GATE_FAILURES: &str = "gate_failures";
pub const COUNTER_AUDIT_FAILURES: &str = "audit_failures";

const COUNTERS: &[&str] = &[
    COUNTER_VERIFIED,
    COUNTER_REJECTED,
    COUNTER_BLOCKED,
    COUNTER_VALIDATION_ERRORS,
    COUNTER_GATE_FAILURES,
    COUNTER_AUDIT_FAILURES,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    Gating,
    Classifying,
    Logging,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validating => "validating",
            Self::Gating => "gating",
            Self::Classifying => "classifying",
            Self::Logging => "logging",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Stateless per request; safe to share behind an `Arc` across any number
/// of concurrent callers. The only shared state is the outcome counters.
pub struct VerificationPipeline {
    gate: SuspiciousActivityGate,
    classifier: Box<dyn Classifier>,
    audit: AuditLogger,
    statistics: Arc<dyn StatisticsStore>,
    clock: Arc<dyn Clock>,
    counters: StatsCounter,
}

impl VerificationPipeline {
    pub fn new(
        suspicious: Arc<dyn SuspiciousActivityStore>,
        log: Arc<dyn VerificationLogStore>,
        statistics: Arc<dyn StatisticsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gate: SuspiciousActivityGate::new(suspicious, GateFailurePolicy::default()),
            classifier: Box::new(TierClassifier),
            audit: AuditLogger::new(log),
            statistics,
            clock,
            counters: StatsCounter::new(COUNTERS),
        }
    }

    /// Build from a single backend that serves all three store roles.
    pub fn from_backend<B>(backend: Arc<B>, clock: Arc<dyn Clock>) -> Self
    where
        B: SuspiciousActivityStore + VerificationLogStore + StatisticsStore + 'static,
    {
        Self::new(backend.clone(), backend.clone(), backend, clock)
    }

    pub fn with_gate_policy(mut self, policy: GateFailurePolicy) -> Self {
        self.gate = self.gate.with_policy(policy);
        self
    }

    pub fn with_classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn gate_policy(&self) -> GateFailurePolicy {
        self.gate.failure_policy()
    }

    /// Run one attempt from an untyped payload.
    ///
    /// Validation failures are returned as errors and leave no audit trail;
    /// every other run ends in exactly one log entry.
    pub fn verify(
        &self,
        raw: &Value,
        caller: &CallerInfo,
    ) -> Result<VerificationOutcome, ValidationError> {
        tracing::trace!(stage = %PipelineStage::Validating, "verification stage");
        let request = RequestValidator::validate(raw).inspect_err(|e| {
            self.counters.increment(COUNTER_VALIDATION_ERRORS);
            tracing::debug!(error = %e, "verification request rejected by validation");
        })?;
        Ok(self.verify_request(request, caller))
    }

    /// Run an already-validated request through gate, classifier and audit log.
    pub fn verify_request(
        &self,
        request: VerificationRequest,
        caller: &CallerInfo,
    ) -> VerificationOutcome {
        tracing::trace!(stage = %PipelineStage::Gating, "verification stage");
        let decision = self.gate.check(&request.email);
        if matches!(decision, GateDecision::LookupFailed { .. }) {
            self.counters.increment(COUNTER_GATE_FAILURES);
        }

        let outcome = if decision.is_blocked() {
            VerificationOutcome::Blocked {
                report: decision.report().cloned(),
                request,
            }
        } else {
            tracing::trace!(stage = %PipelineStage::Classifying, "verification stage");
            if self
                .classifier
                .classify(request.role, request.platform, request.followers)
            {
                VerificationOutcome::Verified { request }
            } else {
                VerificationOutcome::Rejected { request }
            }
        };

        tracing::trace!(stage = %PipelineStage::Logging, "verification stage");
        let request = outcome.request();
        let entry = VerificationLogEntry::new(
            request.email.clone(),
            request.attempt(),
            outcome.status(),
            caller,
            self.clock.now(),
        );
        if self.audit.record(&entry).is_err() {
            self.counters.increment(COUNTER_AUDIT_FAILURES);
        }

        self.counters.increment(match entry.status {
            AttemptStatus::Success => COUNTER_VERIFIED,
            AttemptStatus::Failed => COUNTER_REJECTED,
            AttemptStatus::Blocked => COUNTER_BLOCKED,
        });
        tracing::info!(
            status = %entry.status,
            attempt = %entry.attempt,
            caller = entry.caller_address.as_deref().unwrap_or("-"),
            "verification attempt completed"
        );
        tracing::trace!(stage = %PipelineStage::Done, "verification stage");
        outcome
    }

    /// Fresh statistics snapshot from the store.
    pub fn statistics(&self) -> Result<AggregateStatistics, StoreError> {
        self.statistics
            .fetch_aggregate_statistics()
            .inspect_err(|e| tracing::warn!(error = %e, "failed to fetch aggregate statistics"))
    }

    /// Fetch statistics and derive the current security status.
    pub fn security_status(&self) -> Result<SecurityStatus, StoreError> {
        let stats = self.statistics()?;
        Ok(SecurityStatusAggregator::aggregate(&stats, self.clock.now()))
    }

    /// Suspicious-activity report for one email, without recording an attempt.
    pub fn user_activity(&self, email: &str) -> Result<SuspiciousActivityReport, VerificationError> {
        let email = RequestValidator::normalize_email(email)?;
        Ok(self.gate.report(&email)?)
    }

    /// Current outcome counters, by name.
    pub fn counters(&self) -> BTreeMap<&'static str, u64> {
        self.counters.snapshot()
    }
}
