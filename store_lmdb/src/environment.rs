//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use guardiq_store::ActivityPolicy;
use guardiq_types::Clock;

use crate::{LmdbAuditStore, LmdbError};

pub(crate) const VERIFICATION_LOG_DB: &str = "verification_log";
pub(crate) const LOG_BY_EMAIL_DB: &str = "log_by_email";
pub(crate) const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    verification_log_db: Database<Bytes, Bytes>,
    log_by_email_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The directory is created if missing.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| LmdbError::Heed(e.to_string()))?;

        // SAFETY: the environment is opened once per path by this process and
        // never memory-mapped elsewhere concurrently.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let verification_log_db = env.create_database(&mut wtxn, Some(VERIFICATION_LOG_DB))?;
        let log_by_email_db = env.create_database(&mut wtxn, Some(LOG_BY_EMAIL_DB))?;
        let meta_db = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            verification_log_db,
            log_by_email_db,
            meta_db,
        })
    }

    /// Audit store backed by this environment.
    pub fn audit_store(&self, policy: ActivityPolicy, clock: Arc<dyn Clock>) -> LmdbAuditStore {
        LmdbAuditStore {
            env: Arc::clone(&self.env),
            verification_log_db: self.verification_log_db,
            log_by_email_db: self.log_by_email_db,
            meta_db: self.meta_db,
            policy,
            clock,
        }
    }
}
