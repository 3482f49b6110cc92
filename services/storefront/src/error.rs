use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use bazaar_core::error::error_response;

/// Storefront error variants.
///
/// Source fetch failures are carried as `Internal` only up to the aggregator,
/// which logs them and degrades the source to empty.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("invalid query: {0}")]
    InvalidQuery(&'static str),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StorefrontError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        error_response(status, self.kind(), self.to_string())
    }
}
