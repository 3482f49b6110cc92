//! Back-office roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::ServiceType;

/// Permission level of an authenticated identity.
///
/// Wire format: kebab-case string as stored in the `user_roles.role` column.
/// `Anonymous` is never stored; it is what every failed or missing lookup
/// resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Superadmin,
    StoreManager,
    HotelManager,
    TaxiManager,
    Anonymous,
}

/// Returned when a role string from the backend is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::StoreManager => "store-manager",
            Self::HotelManager => "hotel-manager",
            Self::TaxiManager => "taxi-manager",
            Self::Anonymous => "anonymous",
        }
    }

    /// The entity type a manager role is bound to. `None` for non-manager roles.
    pub fn managed_service(self) -> Option<ServiceType> {
        match self {
            Self::StoreManager => Some(ServiceType::Store),
            Self::HotelManager => Some(ServiceType::Hotel),
            Self::TaxiManager => Some(ServiceType::Taxi),
            Self::Superadmin | Self::Anonymous => None,
        }
    }

    pub fn manager_of(service: ServiceType) -> Self {
        match service {
            ServiceType::Store => Self::StoreManager,
            ServiceType::Hotel => Self::HotelManager,
            ServiceType::Taxi => Self::TaxiManager,
        }
    }

    pub fn is_manager(self) -> bool {
        self.managed_service().is_some()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Self::Superadmin),
            "store-manager" => Ok(Self::StoreManager),
            "hotel-manager" => Ok(Self::HotelManager),
            "taxi-manager" => Ok(Self::TaxiManager),
            "anonymous" => Ok(Self::Anonymous),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}
