use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use subtle::ConstantTimeEq;
use tracing::info;

use bazaar_core::error::AppError;

use crate::domain::repository::CatalogPort;
use crate::domain::types::ChangeEvent;
use crate::state::AppState;

pub const WEBHOOK_SECRET_HEADER: &str = "x-bazaar-webhook-secret";

/// `POST /hooks/row-change`, called by the BaaS database webhook.
///
/// The secret is checked before the body is parsed.
pub async fn row_change<C: CatalogPort + Clone>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let presented = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    if !secrets_match(presented, &state.webhook_secret) {
        return Err(AppError::Unauthorized);
    }

    let event: ChangeEvent =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let invalidated = state.cache.apply(&event).await;
    let table = event.table.clone();
    let op = event.op;
    let delivered = state.feed.publish(event);
    info!(%table, ?op, invalidated, delivered, "row change received");

    Ok(StatusCode::ACCEPTED)
}

fn secrets_match(presented: &str, expected: &str) -> bool {
    !expected.is_empty() && bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}
