//! LMDB implementation of the audit log, suspicious-activity lookup and
//! statistics snapshot.
//!
//! Layout:
//! - `verification_log`: `seq (u64 BE)` -> bincode `VerificationLogEntry`
//! - `log_by_email`: `email ++ 0x00 ++ seq (u64 BE)` -> empty
//! - `meta`: `next_seq` -> `u64 BE`
//!
//! An append writes all three databases in one write transaction, so the
//! index never points at a missing entry.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use guardiq_store::{
    ActivityPolicy, AggregateStatistics, StatisticsStore, StoreError, SuspiciousActivityReport,
    SuspiciousActivityStore, VerificationLogEntry, VerificationLogStore,
};
use guardiq_types::{Clock, Timestamp};

use crate::LmdbError;

const NEXT_SEQ_KEY: &[u8] = b"next_seq";
const EMAIL_KEY_SEPARATOR: u8 = 0x00;

pub struct LmdbAuditStore {
    pub(crate) env: Arc<Env>,
    pub(crate) verification_log_db: Database<Bytes, Bytes>,
    pub(crate) log_by_email_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) policy: ActivityPolicy,
    pub(crate) clock: Arc<dyn Clock>,
}

/// `email ++ 0x00`; every index key for that email starts with it.
fn email_prefix(email: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(email.len() + 1);
    key.extend_from_slice(email.as_bytes());
    key.push(EMAIL_KEY_SEPARATOR);
    key
}

fn email_key(email: &str, seq: u64) -> Vec<u8> {
    let mut key = email_prefix(email);
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

fn decode_seq(bytes: &[u8]) -> Result<u64, LmdbError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LmdbError::Corruption(format!("sequence of {} bytes", bytes.len())))?;
    Ok(u64::from_be_bytes(arr))
}

impl LmdbAuditStore {
    fn read_next_seq(&self, txn: &RoTxn) -> Result<u64, LmdbError> {
        match self.meta_db.get(txn, NEXT_SEQ_KEY)? {
            Some(bytes) => decode_seq(bytes),
            None => Ok(0),
        }
    }

    fn append(&self, entry: &VerificationLogEntry) -> Result<u64, LmdbError> {
        let value = bincode::serialize(entry)?;
        let mut wtxn = self.env.write_txn()?;
        let seq = self.read_next_seq(&wtxn)?;
        let seq_key = seq.to_be_bytes();

        self.verification_log_db.put(&mut wtxn, &seq_key, &value)?;
        self.log_by_email_db
            .put(&mut wtxn, &email_key(&entry.email, seq), &[])?;
        self.meta_db
            .put(&mut wtxn, NEXT_SEQ_KEY, &(seq + 1).to_be_bytes())?;
        wtxn.commit()?;
        Ok(seq)
    }

    fn email_bounds(email: &str) -> (Vec<u8>, Vec<u8>) {
        let prefix = email_prefix(email);
        let mut upper = prefix.clone();
        increment_prefix(&mut upper);
        (prefix, upper)
    }

    fn load_entry(&self, rtxn: &RoTxn, seq: u64) -> Result<VerificationLogEntry, LmdbError> {
        let bytes = self
            .verification_log_db
            .get(rtxn, &seq.to_be_bytes())?
            .ok_or_else(|| LmdbError::Corruption(format!("index points at missing entry {seq}")))?;
        Ok(bincode::deserialize(bytes)?)
    }

    fn load_for_email(&self, email: &str) -> Result<Vec<VerificationLogEntry>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let (prefix, upper) = Self::email_bounds(email);
        let bounds = (
            Bound::Included(prefix.as_slice()),
            Bound::Excluded(upper.as_slice()),
        );

        let mut entries = Vec::new();
        for item in self.log_by_email_db.range(&rtxn, &bounds)? {
            let (key, _) = item?;
            let seq = decode_seq(&key[prefix.len()..])?;
            entries.push(self.load_entry(&rtxn, seq)?);
        }
        Ok(entries)
    }

    /// Newest-first entries for `email` inside the policy window.
    ///
    /// The newest entry is always included so the report can carry the last
    /// attempt time. The walk stops at the first entry older than the window,
    /// so the cost tracks recent activity rather than the whole history.
    fn load_recent_for_email(
        &self,
        email: &str,
        now: Timestamp,
    ) -> Result<Vec<VerificationLogEntry>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let (prefix, upper) = Self::email_bounds(email);
        let bounds = (
            Bound::Included(prefix.as_slice()),
            Bound::Excluded(upper.as_slice()),
        );

        let mut entries = Vec::new();
        for item in self.log_by_email_db.rev_range(&rtxn, &bounds)? {
            let (key, _) = item?;
            let seq = decode_seq(&key[prefix.len()..])?;
            let entry = self.load_entry(&rtxn, seq)?;
            let expired = entry.timestamp.elapsed_since(now) >= self.policy.window_secs;
            if expired && !entries.is_empty() {
                break;
            }
            entries.push(entry);
            if expired {
                break;
            }
        }
        Ok(entries)
    }

    fn load_all(&self) -> Result<Vec<VerificationLogEntry>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let mut entries = Vec::new();
        for item in self.verification_log_db.iter(&rtxn)? {
            let (_, bytes) = item?;
            entries.push(bincode::deserialize(bytes)?);
        }
        Ok(entries)
    }
}

/// Turn `prefix` into the smallest key greater than every key starting with it.
fn increment_prefix(prefix: &mut Vec<u8>) {
    while let Some(last) = prefix.last_mut() {
        if *last < u8::MAX {
            *last += 1;
            return;
        }
        prefix.pop();
    }
}

impl VerificationLogStore for LmdbAuditStore {
    fn append_verification_log(&self, entry: &VerificationLogEntry) -> Result<(), StoreError> {
        let seq = self.append(entry)?;
        tracing::trace!(seq, status = %entry.status, "appended verification log entry");
        Ok(())
    }

    fn entries_for_email(&self, email: &str) -> Result<Vec<VerificationLogEntry>, StoreError> {
        Ok(self.load_for_email(email)?)
    }

    fn log_len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .verification_log_db
            .len(&rtxn)
            .map_err(LmdbError::from)?)
    }
}

impl SuspiciousActivityStore for LmdbAuditStore {
    fn lookup_suspicious_activity(
        &self,
        email: &str,
    ) -> Result<SuspiciousActivityReport, StoreError> {
        let now = self.clock.now();
        let recent = self.load_recent_for_email(email, now)?;
        Ok(self.policy.summarize(&recent, now))
    }
}

impl StatisticsStore for LmdbAuditStore {
    /// Full scan of the log. Cost grows with the total number of entries;
    /// the 24 h and since-midnight counters would need a time index to avoid it.
    fn fetch_aggregate_statistics(&self) -> Result<AggregateStatistics, StoreError> {
        let entries = self.load_all()?;
        Ok(AggregateStatistics::from_entries(&entries, self.clock.now()))
    }
}
