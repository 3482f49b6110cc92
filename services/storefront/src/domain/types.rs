use serde::{Deserialize, Serialize};

use bazaar_domain::entity::{ServiceType, UnifiedSearchResult};

/// Longest accepted query, in characters.
pub const MAX_QUERY_LEN: usize = 200;

/// What the storefront renders for a query.
///
/// The empty query is its own mode: the view shows featured listings instead
/// of a result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchView {
    Featured {
        results: Vec<UnifiedSearchResult>,
        failed_sources: Vec<ServiceType>,
    },
    Results {
        query: String,
        results: Vec<UnifiedSearchResult>,
        failed_sources: Vec<ServiceType>,
    },
}

impl SearchView {
    pub fn results(&self) -> &[UnifiedSearchResult] {
        match self {
            Self::Featured { results, .. } | Self::Results { results, .. } => results,
        }
    }

    pub fn failed_sources(&self) -> &[ServiceType] {
        match self {
            Self::Featured { failed_sources, .. } | Self::Results { failed_sources, .. } => {
                failed_sources
            }
        }
    }

    pub fn is_featured(&self) -> bool {
        matches!(self, Self::Featured { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// One row mutation, as posted by the BaaS database webhook.
///
/// Only the table name matters to subscribers; the row payload is ignored
/// because every change triggers a full re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub op: ChangeOp,
    pub table: String,
    #[serde(default = "default_schema")]
    pub schema: String,
}

fn default_schema() -> String {
    "public".to_owned()
}

impl ChangeEvent {
    /// The listing collection this change touches, if any.
    pub fn service_type(&self) -> Option<ServiceType> {
        if self.schema != "public" {
            return None;
        }
        ServiceType::from_table(&self.table)
    }
}
