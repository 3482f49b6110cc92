use serde_json::to_value;

use bazaar_domain::id::{EntityId, UserId};
use bazaar_domain::role::Role;

use crate::domain::repository::AdminFunctionsPort;
use crate::domain::types::{
    AdminFunction, AssignRolePayload, CreateManagerPayload, DeleteAccountPayload,
    MIN_PASSWORD_LEN, ResetPasswordPayload,
};
use crate::error::BackofficeError;

pub struct CreateManagerInput {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub entity_id: EntityId,
}

pub struct AssignRoleInput {
    pub user_id: UserId,
    pub role: Role,
    pub entity_id: Option<EntityId>,
}

/// Administrative account writes, delegated to backend functions.
pub struct AdminUseCase<F>
where
    F: AdminFunctionsPort,
{
    pub functions: F,
}

impl<F> AdminUseCase<F>
where
    F: AdminFunctionsPort,
{
    pub async fn create_manager(
        &self,
        access_token: &str,
        input: CreateManagerInput,
    ) -> Result<(), BackofficeError> {
        let email = input.email.trim().to_owned();
        if !email.contains('@') {
            return Err(BackofficeError::InvalidInput("email"));
        }
        validate_password(&input.password)?;
        if !input.role.is_manager() {
            return Err(BackofficeError::InvalidInput("role must be a manager role"));
        }

        let payload = CreateManagerPayload {
            email,
            password: input.password,
            role: input.role,
            entity_id: input.entity_id,
        };
        self.invoke(access_token, AdminFunction::CreateManager, payload)
            .await
    }

    pub async fn assign_role(
        &self,
        access_token: &str,
        input: AssignRoleInput,
    ) -> Result<(), BackofficeError> {
        match input.role {
            Role::Anonymous => return Err(BackofficeError::InvalidInput("role")),
            Role::StoreManager | Role::HotelManager | Role::TaxiManager
                if input.entity_id.is_none() =>
            {
                return Err(BackofficeError::InvalidInput("entity_id required for manager role"));
            }
            _ => {}
        }

        let payload = AssignRolePayload {
            user_id: input.user_id,
            role: input.role,
            entity_id: input.entity_id,
        };
        self.invoke(access_token, AdminFunction::AssignRole, payload)
            .await
    }

    pub async fn reset_password(
        &self,
        access_token: &str,
        user_id: UserId,
        new_password: String,
    ) -> Result<(), BackofficeError> {
        validate_password(&new_password)?;
        let payload = ResetPasswordPayload {
            user_id,
            new_password,
        };
        self.invoke(access_token, AdminFunction::ResetPassword, payload)
            .await
    }

    /// Delete an account. An admin cannot delete their own account.
    pub async fn delete_account(
        &self,
        access_token: &str,
        actor: UserId,
        user_id: UserId,
    ) -> Result<(), BackofficeError> {
        if actor == user_id {
            return Err(BackofficeError::InvalidInput("cannot delete own account"));
        }
        self.invoke(
            access_token,
            AdminFunction::DeleteAccount,
            DeleteAccountPayload { user_id },
        )
        .await
    }

    async fn invoke<P: serde::Serialize>(
        &self,
        access_token: &str,
        function: AdminFunction,
        payload: P,
    ) -> Result<(), BackofficeError> {
        let payload = to_value(payload).map_err(anyhow::Error::from)?;
        self.functions.invoke(access_token, function, payload).await?;
        tracing::info!(function = function.name(), "admin function succeeded");
        Ok(())
    }
}

fn validate_password(password: &str) -> Result<(), BackofficeError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BackofficeError::InvalidInput("password too short"));
    }
    Ok(())
}
