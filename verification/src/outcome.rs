//! Terminal outcomes of an attempt that passed validation.

use guardiq_store::SuspiciousActivityReport;
use guardiq_types::AttemptStatus;

use crate::{VerificationError, VerificationRequest};

pub const VERIFIED_MESSAGE: &str = "Verified as VIP";

#[derive(Clone, Debug, PartialEq)]
pub enum VerificationOutcome {
    /// Followers met the role threshold.
    Verified { request: VerificationRequest },
    /// Followers below the role threshold.
    Rejected { request: VerificationRequest },
    /// Stopped by the gate. `report` is `None` when the lookup itself failed
    /// and the gate fails closed.
    Blocked {
        request: VerificationRequest,
        report: Option<SuspiciousActivityReport>,
    },
}

impl VerificationOutcome {
    pub fn request(&self) -> &VerificationRequest {
        match self {
            Self::Verified { request }
            | Self::Rejected { request }
            | Self::Blocked { request, .. } => request,
        }
    }

    /// Audit status written for this outcome.
    pub fn status(&self) -> AttemptStatus {
        match self {
            Self::Verified { .. } => AttemptStatus::Success,
            Self::Rejected { .. } => AttemptStatus::Failed,
            Self::Blocked { .. } => AttemptStatus::Blocked,
        }
    }

    /// Human-readable message for the caller.
    pub fn message(&self) -> String {
        match self {
            Self::Verified { .. } => VERIFIED_MESSAGE.to_string(),
            Self::Rejected { .. } => VerificationError::TierRejected.to_string(),
            Self::Blocked { .. } => VerificationError::SuspiciousActivityBlocked.to_string(),
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    /// The verified request, or the error category of a negative outcome.
    pub fn into_result(self) -> Result<VerificationRequest, VerificationError> {
        match self {
            Self::Verified { request } => Ok(request),
            Self::Rejected { .. } => Err(VerificationError::TierRejected),
            Self::Blocked { .. } => Err(VerificationError::SuspiciousActivityBlocked),
        }
    }
}
