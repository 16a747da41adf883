//! LMDB storage backend for the GuardIQ verification service.
//!
//! Implements the audit log, suspicious-activity and statistics traits from
//! `guardiq-store` using the `heed` LMDB bindings. All logical stores live
//! in a single environment.

pub mod audit;
pub mod environment;
pub mod error;

pub use audit::LmdbAuditStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
