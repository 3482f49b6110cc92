use std::collections::HashMap;

use bazaar_domain::assignment::ManagerAssignment;
use bazaar_domain::id::UserId;
use bazaar_domain::role::Role;

use crate::domain::repository::RoleLookupPort;
use crate::domain::types::{Identity, RoleRecord};

/// Outcome of a role lookup, as cached for the browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: Role,
    pub requires_2fa: bool,
    /// The active assignment backing a manager role.
    pub assignment: Option<ManagerAssignment>,
}

impl RoleGrant {
    pub fn anonymous() -> Self {
        Self {
            role: Role::Anonymous,
            requires_2fa: false,
            assignment: None,
        }
    }
}

/// Session-scoped role cache keyed by identity id.
#[derive(Debug, Default)]
pub struct RoleCache {
    entries: HashMap<UserId, RoleGrant>,
}

impl RoleCache {
    pub fn get(&self, user_id: UserId) -> Option<&RoleGrant> {
        self.entries.get(&user_id)
    }

    pub fn insert(&mut self, user_id: UserId, grant: RoleGrant) {
        self.entries.insert(user_id, grant);
    }

    pub fn invalidate(&mut self, user_id: UserId) {
        self.entries.remove(&user_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps an identity to its role through one backend read per cache miss.
pub struct RoleResolver<R>
where
    R: RoleLookupPort,
{
    pub lookup: R,
}

impl<R> RoleResolver<R>
where
    R: RoleLookupPort,
{
    /// Resolve the role of `identity`, serving from `cache` when possible.
    ///
    /// Never fails: lookup errors, missing rows, unknown role strings and
    /// manager roles without an active assignment all resolve to anonymous.
    /// Lookup errors are not cached so the next resolution retries.
    pub async fn resolve(
        &self,
        cache: &mut RoleCache,
        identity: &Identity,
        access_token: &str,
    ) -> RoleGrant {
        if let Some(grant) = cache.get(identity.id) {
            return grant.clone();
        }

        let record = match self.lookup.find_role(access_token, identity.id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(user_id = %identity.id, error = %e, "role lookup failed, resolving to anonymous");
                return RoleGrant::anonymous();
            }
        };

        let grant = match record {
            Some(record) => grant_from_record(record),
            None => {
                tracing::warn!(user_id = %identity.id, "no role row, resolving to anonymous");
                RoleGrant::anonymous()
            }
        };
        cache.insert(identity.id, grant.clone());
        grant
    }
}

fn grant_from_record(record: RoleRecord) -> RoleGrant {
    let role = match record.role.parse::<Role>() {
        Ok(role) => role,
        Err(e) => {
            tracing::warn!(user_id = %record.user_id, error = %e, "unrecognized role");
            return RoleGrant::anonymous();
        }
    };

    match role {
        Role::Superadmin => RoleGrant {
            role,
            requires_2fa: record.requires_2fa,
            assignment: None,
        },
        Role::StoreManager | Role::HotelManager | Role::TaxiManager => {
            let assignment = record.assignments.into_iter().find(|a| a.grants(role));
            match assignment {
                Some(assignment) => RoleGrant {
                    role,
                    requires_2fa: record.requires_2fa,
                    assignment: Some(assignment),
                },
                None => {
                    tracing::warn!(
                        user_id = %record.user_id,
                        role = %role,
                        "manager role without an active assignment"
                    );
                    RoleGrant::anonymous()
                }
            }
        }
        Role::Anonymous => RoleGrant::anonymous(),
    }
}
