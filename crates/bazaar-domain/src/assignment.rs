//! Manager-to-entity assignments.

use serde::{Deserialize, Serialize};

use crate::entity::ServiceType;
use crate::id::{EntityId, UserId};
use crate::role::Role;

/// Links a manager identity to the one store, hotel or taxi it operates.
///
/// Created and deactivated by administrative functions on the backend; this
/// crate only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerAssignment {
    pub user_id: UserId,
    pub entity_type: ServiceType,
    pub entity_id: EntityId,
    pub is_active: bool,
}

impl ManagerAssignment {
    /// Whether this assignment backs the given manager role.
    pub fn grants(&self, role: Role) -> bool {
        self.is_active && role.managed_service() == Some(self.entity_type)
    }
}
