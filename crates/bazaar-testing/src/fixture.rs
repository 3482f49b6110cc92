//! Listing fixtures.
//!
//! Every builder returns an active, approved listing with a fresh id; tweak
//! fields on the returned value for negative cases.

use uuid::Uuid;

use bazaar_domain::entity::{ApprovalStatus, Hotel, Store, Taxi};
use bazaar_domain::id::EntityId;

pub fn store(name: &str) -> Store {
    Store {
        id: EntityId(Uuid::new_v4()),
        name: name.to_owned(),
        description: None,
        location: None,
        category: Some("restaurant".to_owned()),
        logo_url: None,
        username: None,
        is_active: true,
        approval_status: ApprovalStatus::Approved,
    }
}

pub fn hotel(name: &str, description: &str) -> Hotel {
    Hotel {
        id: EntityId(Uuid::new_v4()),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        location: None,
        category: None,
        image_url: None,
        username: None,
        is_active: true,
        approval_status: ApprovalStatus::Approved,
    }
}

pub fn taxi(driver_name: &str, location: &str) -> Taxi {
    Taxi {
        id: EntityId(Uuid::new_v4()),
        driver_name: driver_name.to_owned(),
        description: None,
        location: Some(location.to_owned()),
        vehicle_type: Some("sedan".to_owned()),
        image_url: None,
        username: None,
        is_active: true,
        approval_status: ApprovalStatus::Approved,
    }
}
