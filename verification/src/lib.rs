//! VIP verification pipeline.
//!
//! One attempt flows through four steps:
//! 1. **Validation**: raw JSON becomes a typed [`VerificationRequest`].
//! 2. **Gate**: the suspicious-activity source may block the caller outright.
//! 3. **Classification**: the claimed role's follower threshold decides the verdict.
//! 4. **Audit**: exactly one log entry records the terminal outcome.
//!
//! [`SecurityStatusAggregator`] is independent of the attempt flow and turns
//! a statistics snapshot into a coarse risk level on demand.

pub mod audit;
pub mod classifier;
pub mod error;
pub mod gate;
pub mod outcome;
pub mod pipeline;
pub mod request;
pub mod status;
pub mod validator;

pub use audit::AuditLogger;
pub use classifier::{Classifier, TierClassifier};
pub use error::{ValidationError, VerificationError};
pub use gate::{GateDecision, GateFailurePolicy, SuspiciousActivityGate};
pub use outcome::VerificationOutcome;
pub use pipeline::{PipelineStage, VerificationPipeline};
pub use request::VerificationRequest;
pub use status::{SecurityStatus, SecurityStatusAggregator};
pub use validator::RequestValidator;
