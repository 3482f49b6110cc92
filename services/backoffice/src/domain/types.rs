use serde::{Deserialize, Serialize};

use bazaar_auth_types::token::AssuranceLevel;
use bazaar_domain::assignment::ManagerAssignment;
use bazaar_domain::id::{EntityId, FactorId, UserId};
use bazaar_domain::role::Role;

use crate::error::BackofficeError;

/// Principal owned by the auth provider; held only for the browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: UserId,
    pub email: Option<String>,
}

/// Tokens and identity returned by a successful provider sign-in, refresh or
/// MFA verification.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,
    pub identity: Identity,
    /// Access-token expiry, seconds since epoch.
    pub expires_at: u64,
    pub aal: AssuranceLevel,
}

/// An MFA factor enrolled on the account.
#[derive(Debug, Clone, Deserialize)]
pub struct Factor {
    pub id: FactorId,
    pub factor_type: String,
    pub status: String,
}

impl Factor {
    pub fn is_verified_totp(&self) -> bool {
        self.factor_type == "totp" && self.status == "verified"
    }
}

/// Row of `user_roles` with its embedded `manager_assignments`.
///
/// `role` stays a raw string here; the resolver decides what an unknown value
/// means.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleRecord {
    pub user_id: UserId,
    pub role: String,
    #[serde(default)]
    pub requires_2fa: bool,
    #[serde(default, rename = "manager_assignments")]
    pub assignments: Vec<ManagerAssignment>,
}

/// Auth state notifications, mirroring the provider's auth-change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    MfaChallengeVerified,
}

/// The two independent sign-in areas a browser session can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Admin,
    Manager,
}

impl SlotKind {
    pub const ALL: [SlotKind; 2] = [SlotKind::Admin, SlotKind::Manager];

    /// The slot a portal's sign-in lands in. Anonymous has no portal.
    pub fn for_portal(portal: Role) -> Option<Self> {
        match portal {
            Role::Superadmin => Some(Self::Admin),
            Role::StoreManager | Role::HotelManager | Role::TaxiManager => Some(Self::Manager),
            Role::Anonymous => None,
        }
    }
}

/// Parse the `{portal}` path segment of the sign-in routes.
///
/// The admin portal is addressed as `admin`; manager portals use the role's
/// wire string.
pub fn parse_portal(segment: &str) -> Result<Role, BackofficeError> {
    match segment {
        "admin" => Ok(Role::Superadmin),
        "store-manager" => Ok(Role::StoreManager),
        "hotel-manager" => Ok(Role::HotelManager),
        "taxi-manager" => Ok(Role::TaxiManager),
        _ => Err(BackofficeError::UnknownPortal),
    }
}

/// Result of a sign-in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SignInOutcome {
    SignedIn { role: Role },
    MfaRequired { factor_id: FactorId },
}

/// Backend functions performing privileged account writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminFunction {
    CreateManager,
    AssignRole,
    ResetPassword,
    DeleteAccount,
}

impl AdminFunction {
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateManager => "create-manager",
            Self::AssignRole => "assign-role",
            Self::ResetPassword => "reset-password",
            Self::DeleteAccount => "delete-account",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateManagerPayload {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub entity_id: EntityId,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignRolePayload {
    pub user_id: UserId,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordPayload {
    pub user_id: UserId,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteAccountPayload {
    pub user_id: UserId,
}

/// Length of a TOTP verification code.
pub const MFA_CODE_LEN: usize = 6;

/// Minimum password length accepted by the admin account functions.
pub const MIN_PASSWORD_LEN: usize = 8;
