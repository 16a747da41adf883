//! Aggregate statistics over the audit log.

use guardiq_types::time::SECS_PER_DAY;
use guardiq_types::{AttemptStatus, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{StoreError, VerificationLogEntry};

/// Point-in-time counters consumed by the security-status aggregator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStatistics {
    /// Distinct emails with at least one successful verification.
    pub active_vips: u64,
    /// Successful verifications in the last 24 hours.
    pub recent_verifications: u64,
    /// Failed verifications since UTC midnight.
    pub failed_attempts_today: u64,
    /// Blocked attempts in the last 24 hours.
    pub high_risk_events: u64,
    /// Every attempt ever logged.
    pub total_attempts: u64,
}

impl AggregateStatistics {
    /// Compute a snapshot from a full scan of the log.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a VerificationLogEntry>,
        now: Timestamp,
    ) -> Self {
        let midnight = now.start_of_day();
        let mut vips = HashSet::new();
        let mut stats = Self::default();

        for entry in entries {
            stats.total_attempts += 1;
            let recent = entry.timestamp.is_within(SECS_PER_DAY, now);
            match entry.status {
                AttemptStatus::Success => {
                    vips.insert(entry.email.as_str());
                    if recent {
                        stats.recent_verifications += 1;
                    }
                }
                AttemptStatus::Failed => {
                    if entry.timestamp >= midnight && entry.timestamp <= now {
                        stats.failed_attempts_today += 1;
                    }
                }
                AttemptStatus::Blocked => {
                    if recent {
                        stats.high_risk_events += 1;
                    }
                }
            }
        }

        stats.active_vips = vips.len() as u64;
        stats
    }
}

/// Source of aggregate statistics snapshots.
///
/// No transactional coupling with log appends is implied.
pub trait StatisticsStore: Send + Sync {
    fn fetch_aggregate_statistics(&self) -> Result<AggregateStatistics, StoreError>;
}
