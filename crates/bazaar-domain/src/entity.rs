//! Searchable marketplace entities and their unified projection.

use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// Discriminant of the three entity collections.
///
/// Wire format: lowercase singular (`"store"`), as used in the
/// `manager_assignments.entity_type` column and in search responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Store,
    Hotel,
    Taxi,
}

impl ServiceType {
    /// Search merge order.
    pub const ALL: [ServiceType; 3] = [Self::Store, Self::Hotel, Self::Taxi];

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Store => "stores",
            Self::Hotel => "hotels",
            Self::Taxi => "taxis",
        }
    }

    pub fn from_table(table: &str) -> Option<Self> {
        match table {
            "stores" => Some(Self::Store),
            "hotels" => Some(Self::Hotel),
            "taxis" => Some(Self::Taxi),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Hotel => "hotel",
            Self::Taxi => "taxi",
        }
    }
}

/// Moderation state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxi {
    pub id: EntityId,
    pub driver_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
}

/// Only active, approved listings are eligible for public search.
pub fn is_publicly_listed(is_active: bool, approval_status: ApprovalStatus) -> bool {
    is_active && approval_status == ApprovalStatus::Approved
}

impl Store {
    pub fn is_publicly_listed(&self) -> bool {
        is_publicly_listed(self.is_active, self.approval_status)
    }
}

impl Hotel {
    pub fn is_publicly_listed(&self) -> bool {
        is_publicly_listed(self.is_active, self.approval_status)
    }
}

impl Taxi {
    pub fn is_publicly_listed(&self) -> bool {
        is_publicly_listed(self.is_active, self.approval_status)
    }
}

/// Projection of any searchable entity, tagged with where it came from.
///
/// Built fresh for every query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedSearchResult {
    pub id: EntityId,
    pub service_type: ServiceType,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Store/hotel category, or the taxi's vehicle type.
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub username: Option<String>,
}

impl From<Store> for UnifiedSearchResult {
    fn from(s: Store) -> Self {
        Self {
            id: s.id,
            service_type: ServiceType::Store,
            name: s.name,
            description: s.description,
            location: s.location,
            category: s.category,
            image_url: s.logo_url,
            username: s.username,
        }
    }
}

impl From<Hotel> for UnifiedSearchResult {
    fn from(h: Hotel) -> Self {
        Self {
            id: h.id,
            service_type: ServiceType::Hotel,
            name: h.name,
            description: h.description,
            location: h.location,
            category: h.category,
            image_url: h.image_url,
            username: h.username,
        }
    }
}

impl From<Taxi> for UnifiedSearchResult {
    fn from(t: Taxi) -> Self {
        Self {
            id: t.id,
            service_type: ServiceType::Taxi,
            name: t.driver_name,
            description: t.description,
            location: t.location,
            category: t.vehicle_type,
            image_url: t.image_url,
            username: t.username,
        }
    }
}
