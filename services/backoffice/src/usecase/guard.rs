use bazaar_domain::assignment::ManagerAssignment;
use bazaar_domain::id::UserId;
use bazaar_domain::role::Role;

/// What a guarded handler receives about the caller.
#[derive(Debug, Clone)]
pub struct Grant {
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: Role,
    pub assignment: Option<ManagerAssignment>,
    /// Provider token, forwarded on backend calls made for this caller.
    pub access_token: String,
}

/// Settled grants of a browser session, as the guard sees them.
///
/// A slot with an outstanding second factor contributes no grant.
#[derive(Debug, Clone, Default)]
pub struct GuardSnapshot {
    pub loading: bool,
    pub admin: Option<Grant>,
    pub manager: Option<Grant>,
}

impl GuardSnapshot {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create, reassign and delete back-office accounts. Superadmin only.
    ManageAccounts,
    /// Operate an assigned listing. Any manager role.
    ManageListings,
}

/// What a guarded route demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Role(Role),
    Capability(Capability),
}

impl Requirement {
    /// Where an unsatisfied request is sent.
    pub fn login_route(self) -> &'static str {
        match self {
            Self::Role(Role::Superadmin) | Self::Capability(Capability::ManageAccounts) => {
                "/admin/login"
            }
            Self::Role(Role::StoreManager) => "/store-manager/login",
            Self::Role(Role::HotelManager) => "/hotel-manager/login",
            Self::Role(Role::TaxiManager) => "/taxi-manager/login",
            Self::Capability(Capability::ManageListings) => "/manager/login",
            Self::Role(Role::Anonymous) => "/",
        }
    }
}

#[derive(Debug, Clone)]
pub enum GuardDecision {
    Loading,
    Redirect(&'static str),
    /// Render the route. `None` only for requirements every visitor meets.
    Render(Option<Grant>),
}

/// Decide whether a route is rendered for the given snapshot.
///
/// Never redirects while loading. Admin-only requirements also need the
/// manager slot to be empty: a concurrent manager sign-in invalidates the
/// admin grant.
pub fn check(requirement: Requirement, snapshot: &GuardSnapshot) -> GuardDecision {
    if snapshot.loading {
        return GuardDecision::Loading;
    }
    let redirect = GuardDecision::Redirect(requirement.login_route());

    match requirement {
        Requirement::Role(Role::Superadmin) | Requirement::Capability(Capability::ManageAccounts) => {
            match (&snapshot.admin, &snapshot.manager) {
                (Some(grant), None) if grant.role == Role::Superadmin => {
                    GuardDecision::Render(Some(grant.clone()))
                }
                _ => redirect,
            }
        }
        Requirement::Role(role @ (Role::StoreManager | Role::HotelManager | Role::TaxiManager)) => {
            match &snapshot.manager {
                Some(grant) if grant.role == role && grant.assignment.is_some() => {
                    GuardDecision::Render(Some(grant.clone()))
                }
                _ => redirect,
            }
        }
        Requirement::Capability(Capability::ManageListings) => match &snapshot.manager {
            Some(grant) if grant.role.is_manager() && grant.assignment.is_some() => {
                GuardDecision::Render(Some(grant.clone()))
            }
            _ => redirect,
        },
        Requirement::Role(Role::Anonymous) => GuardDecision::Render(None),
    }
}
