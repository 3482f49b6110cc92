use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use bazaar_core::error::error_response;

/// Backoffice error variants.
///
/// Lookup failures never appear here: the role resolver turns them into the
/// anonymous role before any caller sees them.
#[derive(Debug, thiserror::Error)]
pub enum BackofficeError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("session expired")]
    SessionExpired,
    #[error("verification code rejected")]
    MfaMismatch,
    #[error("no verification in progress")]
    NoChallenge,
    #[error("account is not authorized for this area")]
    WrongRole,
    #[error("unknown portal")]
    UnknownPortal,
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("request rejected: {0}")]
    AdminFunctionRejected(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl BackofficeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::MfaMismatch => "MFA_MISMATCH",
            Self::NoChallenge => "NO_CHALLENGE",
            Self::WrongRole => "WRONG_ROLE",
            Self::UnknownPortal => "UNKNOWN_PORTAL",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::AdminFunctionRejected(_) => "ADMIN_FUNCTION_REJECTED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for BackofficeError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidCredentials | Self::SessionExpired | Self::MfaMismatch => {
                StatusCode::UNAUTHORIZED
            }
            Self::NoChallenge => StatusCode::CONFLICT,
            Self::WrongRole => StatusCode::FORBIDDEN,
            Self::UnknownPortal => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::AdminFunctionRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        error_response(status, self.kind(), self.to_string())
    }
}
