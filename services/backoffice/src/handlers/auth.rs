use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use bazaar_auth_types::cookie::{clear_session_cookie, set_session_cookie};
use bazaar_auth_types::identity::BrowserSession;

use crate::domain::types::{SlotKind, parse_portal};
use crate::error::BackofficeError;
use crate::handlers::settle;
use crate::state::AppState;
use crate::usecase::session::SessionView;

// ── POST /auth/{portal}/sign-in ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

pub async fn sign_in(
    State(state): State<AppState>,
    Path(portal): Path<String>,
    session: BrowserSession,
    jar: CookieJar,
    Json(body): Json<SignInRequest>,
) -> Result<impl IntoResponse, BackofficeError> {
    let portal = parse_portal(&portal)?;
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(BackofficeError::InvalidInput("email and password are required"));
    }

    let (key, entry) = state.sessions.get_or_create(session.key);
    let fresh = session.key != Some(key);
    let mut ctx = entry.context.lock().await;
    settle(&state, &entry, &mut ctx).await;

    let outcome = match state
        .session_gate()
        .sign_in(&mut ctx, portal, email, &body.password)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            // No cookie is issued on failure, so a new empty session is unreachable.
            let abandoned = fresh && ctx.admin.is_none() && ctx.manager.is_none();
            drop(ctx);
            if abandoned {
                state.sessions.remove(key);
            }
            return Err(e);
        }
    };

    let jar = set_session_cookie(jar, key, state.cookie_domain.clone());
    Ok((jar, Json(outcome)))
}

// ── POST /auth/{portal}/mfa/verify ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyMfaRequest {
    pub code: String,
}

pub async fn verify_mfa(
    State(state): State<AppState>,
    Path(portal): Path<String>,
    session: BrowserSession,
    Json(body): Json<VerifyMfaRequest>,
) -> Result<impl IntoResponse, BackofficeError> {
    let portal = parse_portal(&portal)?;
    let entry = session
        .key
        .and_then(|key| state.sessions.get(key))
        .ok_or(BackofficeError::NoChallenge)?;
    let mut ctx = entry.context.lock().await;
    settle(&state, &entry, &mut ctx).await;

    let outcome = state
        .session_gate()
        .verify_mfa(&mut ctx, portal, body.code.trim())
        .await?;
    Ok(Json(outcome))
}

// ── POST /auth/{portal}/sign-out ──────────────────────────────────────────────

pub async fn sign_out(
    State(state): State<AppState>,
    Path(portal): Path<String>,
    session: BrowserSession,
    jar: CookieJar,
) -> Result<impl IntoResponse, BackofficeError> {
    let portal = parse_portal(&portal)?;
    let kind = SlotKind::for_portal(portal).ok_or(BackofficeError::UnknownPortal)?;

    let Some((key, entry)) = session
        .key
        .and_then(|key| state.sessions.get(key).map(|entry| (key, entry)))
    else {
        return Ok((StatusCode::NO_CONTENT, jar));
    };

    let mut ctx = entry.context.lock().await;
    state.session_gate().sign_out(&mut ctx, kind).await;

    if ctx.admin.is_none() && ctx.manager.is_none() {
        drop(ctx);
        state.sessions.remove(key);
        let jar = clear_session_cookie(jar, state.cookie_domain.clone());
        return Ok((StatusCode::NO_CONTENT, jar));
    }
    Ok((StatusCode::NO_CONTENT, jar))
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

pub async fn session(
    State(state): State<AppState>,
    session: BrowserSession,
) -> Json<SessionView> {
    let Some(entry) = session.key.and_then(|key| state.sessions.get(key)) else {
        return Json(SessionView {
            loading: false,
            slots: vec![],
        });
    };
    let mut ctx = entry.context.lock().await;
    settle(&state, &entry, &mut ctx).await;
    Json(ctx.view())
}
