//! HTTP API for the GuardIQ VIP verification service.
//!
//! Provides endpoints under `/api` for:
//! - VIP verification attempts
//! - Aggregate statistics and the derived security status
//! - Per-email suspicious-activity lookups
//! - Service health and outcome counters

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::ServiceConfig;
pub use error::RpcError;
pub use server::{router, RpcServer};
