//! Parse errors for the closed vocabularies in this crate.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}
