use guardiq_store::StoreError;
use thiserror::Error;

/// Malformed, missing or out-of-range input. Nothing is logged for these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No data provided")]
    MissingPayload,

    #[error("All fields are required and followers must be non-negative")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid role selected")]
    InvalidRole(String),

    #[error("Invalid platform selected")]
    InvalidPlatform(String),
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Account temporarily locked due to suspicious activity. Please contact security.")]
    SuspiciousActivityBlocked,

    #[error("You're not a VIP. Insufficient followers for your role category.")]
    TierRejected,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
