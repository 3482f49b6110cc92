//! Newtype wrappers for domain identifiers.
//!
//! Every identifier handed out by the backend is a UUID; the wrappers keep a
//! factor id from being passed where a challenge id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(
    /// Identifies an auth-provider principal.
    UserId
);

uuid_id!(
    /// Identifies a store, hotel or taxi row.
    EntityId
);

uuid_id!(
    /// Identifies an enrolled MFA factor.
    FactorId
);

uuid_id!(
    /// Identifies one MFA challenge issued against a factor.
    ChallengeId
);
