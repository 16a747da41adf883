//! Nullable store: thread-safe in-memory storage for testing.
//!
//! By default it behaves like a real backend: reports and statistics are
//! derived from the entries appended so far, using the shared rules in
//! `guardiq-store`. Tests can override either, or make any call fail.

use guardiq_store::{
    ActivityPolicy, AggregateStatistics, StatisticsStore, StoreError, SuspiciousActivityReport,
    SuspiciousActivityStore, VerificationLogEntry, VerificationLogStore,
};
use guardiq_types::Clock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::NullClock;

/// An in-memory audit log, signal source and statistics source.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    entries: Mutex<Vec<VerificationLogEntry>>,
    flagged: Mutex<HashSet<String>>,
    statistics_override: Mutex<Option<AggregateStatistics>>,
    policy: ActivityPolicy,
    clock: Arc<dyn Clock>,
    fail_lookups: AtomicBool,
    fail_appends: AtomicBool,
    fail_statistics: AtomicBool,
    lookup_calls: AtomicUsize,
}

impl NullStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(NullClock::new(1_000_000)))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            flagged: Mutex::new(HashSet::new()),
            statistics_override: Mutex::new(None),
            policy: ActivityPolicy::default(),
            clock,
            fail_lookups: AtomicBool::new(false),
            fail_appends: AtomicBool::new(false),
            fail_statistics: AtomicBool::new(false),
            lookup_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_policy(mut self, policy: ActivityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Force every lookup for `email` to report suspicious activity.
    pub fn flag(&self, email: &str) {
        self.flagged.lock().unwrap().insert(email.to_string());
    }

    /// Return these statistics instead of computing them from the log.
    pub fn set_statistics(&self, stats: AggregateStatistics) {
        *self.statistics_override.lock().unwrap() = Some(stats);
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_statistics(&self, fail: bool) {
        self.fail_statistics.store(fail, Ordering::SeqCst);
    }

    /// Every entry appended so far (for assertions).
    pub fn entries(&self) -> Vec<VerificationLogEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Number of suspicious-activity lookups served, failed ones included.
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SuspiciousActivityStore for NullStore {
    fn lookup_suspicious_activity(
        &self,
        email: &str,
    ) -> Result<SuspiciousActivityReport, StoreError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null store: lookups disabled".into()));
        }
        if self.flagged.lock().unwrap().contains(email) {
            return Ok(SuspiciousActivityReport::flagged().with_detail("reason", "flagged"));
        }
        let entries = self.entries.lock().unwrap();
        let history = entries.iter().filter(|e| e.email == email);
        Ok(self.policy.summarize(history, self.clock.now()))
    }
}

impl VerificationLogStore for NullStore {
    fn append_verification_log(&self, entry: &VerificationLogEntry) -> Result<(), StoreError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null store: appends disabled".into()));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    fn entries_for_email(&self, email: &str) -> Result<Vec<VerificationLogEntry>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.email == email)
            .cloned()
            .collect())
    }

    fn log_len(&self) -> Result<u64, StoreError> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }
}

impl StatisticsStore for NullStore {
    fn fetch_aggregate_statistics(&self) -> Result<AggregateStatistics, StoreError> {
        if self.fail_statistics.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null store: statistics disabled".into()));
        }
        if let Some(stats) = self.statistics_override.lock().unwrap().clone() {
            return Ok(stats);
        }
        let entries = self.entries.lock().unwrap();
        Ok(AggregateStatistics::from_entries(
            entries.iter(),
            self.clock.now(),
        ))
    }
}
