use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use bazaar_auth_types::identity::BrowserSession;

use crate::handlers::{now_secs, settle};
use crate::state::AppState;
use crate::usecase::guard::{GuardDecision, GuardSnapshot, Requirement, check};

/// Gate a route on a requirement.
///
/// Use with `middleware::from_fn_with_state((state, requirement), route_guard)`.
/// A rendered route receives the caller's `Grant` as a request extension.
pub async fn route_guard(
    State((state, requirement)): State<(AppState, Requirement)>,
    session: BrowserSession,
    mut request: Request,
    next: Next,
) -> Response {
    let snapshot = match session.key.and_then(|key| state.sessions.get(key)) {
        None => GuardSnapshot::default(),
        Some(entry) if entry.is_restoring() => GuardSnapshot::loading(),
        Some(entry) => {
            let mut ctx = entry.context.lock().await;
            if ctx.needs_restore(now_secs()) {
                settle(&state, &entry, &mut ctx).await;
            }
            ctx.snapshot()
        }
    };

    match check(requirement, &snapshot) {
        GuardDecision::Loading => (
            StatusCode::ACCEPTED,
            [(RETRY_AFTER, "1")],
            Json(json!({ "state": "loading" })),
        )
            .into_response(),
        GuardDecision::Redirect(to) => {
            tracing::debug!(?requirement, to, "guard redirect");
            Redirect::to(to).into_response()
        }
        GuardDecision::Render(grant) => {
            if let Some(grant) = grant {
                request.extensions_mut().insert(grant);
            }
            next.run(request).await
        }
    }
}
