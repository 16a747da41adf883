//! Suspicious-activity reports and the rule backends use to produce them.

use guardiq_types::{AttemptStatus, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::VerificationLogEntry;

/// Result of a suspicious-activity lookup.
///
/// Only `is_suspicious` is interpreted by the pipeline; `details` is opaque
/// supporting data that is passed through to readers unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousActivityReport {
    pub is_suspicious: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl SuspiciousActivityReport {
    /// A suspicious report with no supporting details.
    pub fn flagged() -> Self {
        Self {
            is_suspicious: true,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Thresholds for flagging an email as suspicious.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPolicy {
    /// Look-back window, in seconds.
    pub window_secs: u64,
    /// Failed attempts inside the window at which the email is flagged.
    pub max_failed_attempts: u64,
}

impl Default for ActivityPolicy {
    fn default() -> Self {
        Self {
            window_secs: 3_600,
            max_failed_attempts: 5,
        }
    }
}

impl ActivityPolicy {
    /// Summarize the recent history of one email.
    ///
    /// `entries` should already be filtered to that email; entries outside
    /// the window are ignored.
    pub fn summarize<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a VerificationLogEntry>,
        now: Timestamp,
    ) -> SuspiciousActivityReport {
        let mut failed = 0u64;
        let mut blocked = 0u64;
        let mut total = 0u64;
        let mut last_attempt: Option<Timestamp> = None;

        for entry in entries {
            last_attempt = last_attempt.max(Some(entry.timestamp));
            if !entry.timestamp.is_within(self.window_secs, now) {
                continue;
            }
            total += 1;
            match entry.status {
                AttemptStatus::Failed => failed += 1,
                AttemptStatus::Blocked => blocked += 1,
                AttemptStatus::Success => {}
            }
        }

        SuspiciousActivityReport {
            is_suspicious: self.max_failed_attempts > 0 && failed >= self.max_failed_attempts,
            details: Map::new(),
        }
        .with_detail("failed_attempts", failed)
        .with_detail("blocked_attempts", blocked)
        .with_detail("total_attempts", total)
        .with_detail("window_secs", self.window_secs)
        .with_detail(
            "last_attempt_at",
            last_attempt.map_or(Value::Null, |t| Value::from(t.as_secs())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttemptDetails;
    use guardiq_types::{CallerInfo, Platform, Role};

    fn entry(status: AttemptStatus, at: u64) -> VerificationLogEntry {
        VerificationLogEntry::new(
            "x@y.com",
            AttemptDetails::new(Role::Vip, Platform::Twitter, 10),
            status,
            &CallerInfo::default(),
            Timestamp::new(at),
        )
    }

    #[test]
    fn empty_history_is_not_suspicious() {
        let report = ActivityPolicy::default().summarize([], Timestamp::new(10_000));
        assert!(!report.is_suspicious);
        assert_eq!(report.details["total_attempts"], 0);
        assert_eq!(report.details["last_attempt_at"], Value::Null);
    }

    #[test]
    fn flags_at_threshold_of_failures_inside_window() {
        let policy = ActivityPolicy {
            window_secs: 100,
            max_failed_attempts: 3,
        };
        let now = Timestamp::new(1_000);
        let history = vec![
            entry(AttemptStatus::Failed, 950),
            entry(AttemptStatus::Failed, 960),
            entry(AttemptStatus::Success, 970),
        ];
        assert!(!policy.summarize(&history, now).is_suspicious);

        let mut history = history;
        history.push(entry(AttemptStatus::Failed, 990));
        let report = policy.summarize(&history, now);
        assert!(report.is_suspicious);
        assert_eq!(report.details["failed_attempts"], 3);
        assert_eq!(report.details["total_attempts"], 4);
        assert_eq!(report.details["last_attempt_at"], 990);
    }

    #[test]
    fn stale_failures_fall_out_of_the_window() {
        let policy = ActivityPolicy {
            window_secs: 100,
            max_failed_attempts: 2,
        };
        let history = vec![
            entry(AttemptStatus::Failed, 100),
            entry(AttemptStatus::Failed, 150),
            entry(AttemptStatus::Failed, 950),
        ];
        let report = policy.summarize(&history, Timestamp::new(1_000));
        assert!(!report.is_suspicious);
        assert_eq!(report.details["failed_attempts"], 1);
    }

    #[test]
    fn blocked_attempts_are_reported_but_do_not_count_as_failures() {
        let policy = ActivityPolicy {
            window_secs: 100,
            max_failed_attempts: 1,
        };
        let history = vec![entry(AttemptStatus::Blocked, 990)];
        let report = policy.summarize(&history, Timestamp::new(1_000));
        assert!(!report.is_suspicious);
        assert_eq!(report.details["blocked_attempts"], 1);
    }

    #[test]
    fn report_serializes_details_inline() {
        let report = SuspiciousActivityReport::flagged().with_detail("reason", "manual");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["is_suspicious"], true);
        assert_eq!(json["reason"], "manual");
    }
}
