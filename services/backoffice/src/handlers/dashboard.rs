use axum::{Extension, Json};
use serde::Serialize;

use bazaar_domain::assignment::ManagerAssignment;
use bazaar_domain::entity::ServiceType;
use bazaar_domain::id::{EntityId, UserId};
use bazaar_domain::role::Role;

use crate::error::BackofficeError;
use crate::usecase::guard::Grant;

#[derive(Serialize)]
pub struct DashboardResponse {
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<ServiceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
}

impl From<Grant> for DashboardResponse {
    fn from(grant: Grant) -> Self {
        Self {
            user_id: grant.user_id,
            email: grant.email,
            role: grant.role,
            entity_type: grant.assignment.as_ref().map(|a| a.entity_type),
            entity_id: grant.assignment.as_ref().map(|a| a.entity_id),
        }
    }
}

// ── GET /admin/dashboard ──────────────────────────────────────────────────────

pub async fn admin_dashboard(Extension(grant): Extension<Grant>) -> Json<DashboardResponse> {
    Json(grant.into())
}

// ── GET /{store,hotel,taxi}-manager/dashboard ─────────────────────────────────

pub async fn manager_dashboard(Extension(grant): Extension<Grant>) -> Json<DashboardResponse> {
    Json(grant.into())
}

// ── GET /manager/assignment ───────────────────────────────────────────────────

pub async fn assignment(
    Extension(grant): Extension<Grant>,
) -> Result<Json<ManagerAssignment>, BackofficeError> {
    grant
        .assignment
        .map(Json)
        .ok_or(BackofficeError::WrongRole)
}
