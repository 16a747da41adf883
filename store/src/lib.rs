//! Abstract storage traits for the GuardIQ verification service.
//!
//! The verification pipeline depends only on these traits. Every backend
//! (LMDB, in-memory for testing) implements them, and shares the activity
//! and statistics rules in [`activity`] and [`statistics`] so that scores
//! do not drift between backends.

pub mod activity;
pub mod error;
pub mod log_entry;
pub mod statistics;
pub mod suspicious;
pub mod verification_log;

pub use activity::{ActivityPolicy, SuspiciousActivityReport};
pub use error::StoreError;
pub use log_entry::{AttemptDetails, VerificationLogEntry};
pub use statistics::{AggregateStatistics, StatisticsStore};
pub use suspicious::SuspiciousActivityStore;
pub use verification_log::VerificationLogStore;
