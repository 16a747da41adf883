//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use guardiq_store::StoreError;
use guardiq_verification::{ValidationError, VerificationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Endpoint not found")]
    EndpointNotFound,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<VerificationError> for RpcError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::Validation(v) => RpcError::Validation(v),
            VerificationError::Store(s) => RpcError::Store(s),
            other => RpcError::Server(other.to_string()),
        }
    }
}

impl RpcError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RpcError::Validation(_) => StatusCode::BAD_REQUEST,
            RpcError::EndpointNotFound => StatusCode::NOT_FOUND,
            RpcError::Store(_) | RpcError::Config(_) | RpcError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Client errors carry their message; server-side detail stays in the logs.
impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_by_category() {
        assert_eq!(
            RpcError::from(ValidationError::InvalidEmail).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RpcError::EndpointNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            RpcError::from(StoreError::Unavailable("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn verification_errors_map_to_their_category() {
        let e = RpcError::from(VerificationError::Validation(ValidationError::MissingPayload));
        assert!(matches!(e, RpcError::Validation(ValidationError::MissingPayload)));

        let e = RpcError::from(VerificationError::Store(StoreError::Backend("x".into())));
        assert!(matches!(e, RpcError::Store(_)));
    }

    #[test]
    fn validation_message_is_passed_through() {
        let e = RpcError::from(ValidationError::InvalidRole("wizard".into()));
        assert_eq!(e.to_string(), "Invalid role selected");
    }
}
