#![allow(async_fn_in_trait)]

use bazaar_domain::id::{ChallengeId, FactorId, UserId};

use crate::domain::types::{AdminFunction, Factor, Identity, ProviderSession, RoleRecord};
use crate::error::BackofficeError;

/// Port for the external auth provider.
pub trait AuthPort: Send + Sync {
    /// Password sign-in. Rejected credentials map to `InvalidCredentials`.
    async fn sign_in(&self, email: &str, password: &str)
    -> Result<ProviderSession, BackofficeError>;

    /// Exchange a refresh token for a new session. Rejection maps to `SessionExpired`.
    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, BackofficeError>;

    /// Current identity behind an access token (`getSession`).
    async fn get_user(&self, access_token: &str) -> Result<Identity, BackofficeError>;

    async fn list_factors(&self, access_token: &str) -> Result<Vec<Factor>, BackofficeError>;

    /// Ask the provider to issue a challenge for one factor.
    async fn challenge(
        &self,
        access_token: &str,
        factor_id: FactorId,
    ) -> Result<ChallengeId, BackofficeError>;

    /// Verify a code against an issued challenge. A wrong code maps to `MfaMismatch`.
    async fn verify(
        &self,
        access_token: &str,
        factor_id: FactorId,
        challenge_id: ChallengeId,
        code: &str,
    ) -> Result<ProviderSession, BackofficeError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackofficeError>;
}

/// Port for reading the backing `user_roles` table.
pub trait RoleLookupPort: Send + Sync {
    /// Role row for a user, with its manager assignments. `None` when no row exists.
    async fn find_role(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> Result<Option<RoleRecord>, BackofficeError>;
}

/// Port for the backend functions that perform privileged account writes.
pub trait AdminFunctionsPort: Send + Sync {
    /// Invoke a function with a JSON payload. A `{error}` reply maps to
    /// `AdminFunctionRejected`.
    async fn invoke(
        &self,
        access_token: &str,
        function: AdminFunction,
        payload: serde_json::Value,
    ) -> Result<(), BackofficeError>;
}
