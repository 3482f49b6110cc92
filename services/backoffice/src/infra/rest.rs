use anyhow::Context;
use reqwest::Method;

use bazaar_core::baas::BaasClient;
use bazaar_domain::id::UserId;

use crate::domain::repository::RoleLookupPort;
use crate::domain::types::RoleRecord;
use crate::error::BackofficeError;

const ROLE_SELECT: &str =
    "user_id,role,requires_2fa,manager_assignments(user_id,entity_type,entity_id,is_active)";

/// Reads `user_roles` through the REST layer as the signed-in user.
#[derive(Clone)]
pub struct RestRoleLookup {
    pub baas: BaasClient,
}

pub fn role_path(user_id: UserId) -> String {
    format!("/rest/v1/user_roles?select={ROLE_SELECT}&user_id=eq.{user_id}&limit=1")
}

impl RoleLookupPort for RestRoleLookup {
    async fn find_role(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> Result<Option<RoleRecord>, BackofficeError> {
        let resp = self
            .baas
            .request(Method::GET, &role_path(user_id), Some(access_token))
            .send()
            .await
            .context("role lookup request failed")?
            .error_for_status()
            .context("role lookup rejected")?;
        let rows = resp
            .json::<Vec<RoleRecord>>()
            .await
            .context("invalid role lookup response")?;
        Ok(rows.into_iter().next())
    }
}
