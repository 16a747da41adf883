//! Security status derived from aggregate statistics.

use guardiq_store::AggregateStatistics;
use guardiq_types::{SecurityLevel, Timestamp};
use serde::Serialize;

/// Snapshot of overall risk. Recomputed on every request, never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SecurityStatus {
    pub level: SecurityLevel,
    /// Percentage, rounded to two decimal places.
    pub success_rate: f64,
    pub total_vips: u64,
    pub recent_activity: u64,
    pub threat_level: u64,
    pub computed_at: Timestamp,
}

pub struct SecurityStatusAggregator;

impl SecurityStatusAggregator {
    /// Blocked events above this are critical.
    pub const CRITICAL_RISK_EVENTS: u64 = 5;
    /// Blocked events above this are medium.
    pub const MEDIUM_RISK_EVENTS: u64 = 2;
    /// Failures today above this are medium.
    pub const MEDIUM_FAILED_ATTEMPTS: u64 = 10;

    pub fn aggregate(stats: &AggregateStatistics, now: Timestamp) -> SecurityStatus {
        let total = stats
            .recent_verifications
            .saturating_add(stats.failed_attempts_today);
        let rate = stats.recent_verifications as f64 / total.max(1) as f64 * 100.0;

        SecurityStatus {
            level: Self::level(stats),
            success_rate: round2(rate),
            total_vips: stats.active_vips,
            recent_activity: stats.recent_verifications,
            threat_level: stats.high_risk_events,
            computed_at: now,
        }
    }

    /// First matching rule wins.
    pub fn level(stats: &AggregateStatistics) -> SecurityLevel {
        if stats.high_risk_events > Self::CRITICAL_RISK_EVENTS {
            SecurityLevel::Critical
        } else if stats.high_risk_events > Self::MEDIUM_RISK_EVENTS
            || stats.failed_attempts_today > Self::MEDIUM_FAILED_ATTEMPTS
        {
            SecurityLevel::Medium
        } else {
            SecurityLevel::High
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
