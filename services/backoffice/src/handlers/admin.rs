use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use bazaar_domain::id::{EntityId, UserId};
use bazaar_domain::role::Role;

use crate::error::BackofficeError;
use crate::state::AppState;
use crate::usecase::admin::{AssignRoleInput, CreateManagerInput};
use crate::usecase::guard::Grant;

// ── POST /admin/managers ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateManagerRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub entity_id: EntityId,
}

pub async fn create_manager(
    State(state): State<AppState>,
    Extension(grant): Extension<Grant>,
    Json(body): Json<CreateManagerRequest>,
) -> Result<StatusCode, BackofficeError> {
    state
        .admin_usecase()
        .create_manager(
            &grant.access_token,
            CreateManagerInput {
                email: body.email,
                password: body.password,
                role: body.role,
                entity_id: body.entity_id,
            },
        )
        .await?;
    Ok(StatusCode::CREATED)
}

// ── PUT /admin/managers/{user_id}/role ────────────────────────────────────────

#[derive(Deserialize)]
pub struct AssignRoleRequest {
    pub role: Role,
    #[serde(default)]
    pub entity_id: Option<EntityId>,
}

pub async fn assign_role(
    State(state): State<AppState>,
    Extension(grant): Extension<Grant>,
    Path(user_id): Path<UserId>,
    Json(body): Json<AssignRoleRequest>,
) -> Result<StatusCode, BackofficeError> {
    state
        .admin_usecase()
        .assign_role(
            &grant.access_token,
            AssignRoleInput {
                user_id,
                role: body.role,
                entity_id: body.entity_id,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /admin/managers/{user_id}/password-reset ─────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Extension(grant): Extension<Grant>,
    Path(user_id): Path<UserId>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<StatusCode, BackofficeError> {
    state
        .admin_usecase()
        .reset_password(&grant.access_token, user_id, body.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /admin/managers/{user_id} ──────────────────────────────────────────

pub async fn delete_account(
    State(state): State<AppState>,
    Extension(grant): Extension<Grant>,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode, BackofficeError> {
    state
        .admin_usecase()
        .delete_account(&grant.access_token, grant.user_id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
