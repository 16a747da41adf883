//! Fundamental types for the GuardIQ VIP verification service.
//!
//! Defines the vocabulary shared by every other crate in the workspace:
//! claimed roles and platforms, attempt statuses, caller context, and the
//! timestamp/clock pair used for audit records.

pub mod caller;
pub mod error;
pub mod role;
pub mod status;
pub mod time;

pub use caller::CallerInfo;
pub use error::TypesError;
pub use role::{Platform, Role};
pub use status::{AttemptStatus, SecurityLevel};
pub use time::{Clock, SystemClock, Timestamp};
