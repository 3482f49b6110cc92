//! Pagination over in-memory result lists.

use serde::{Deserialize, Serialize};

/// Page selection for list endpoints.
///
/// - `per_page`: 1–60, default 12 (one storefront grid)
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page", rename = "per-page")]
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    12
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `per_page` to 1–60 and `page` to ≥ 1.
    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, 60),
            page: self.page.max(1),
        }
    }

    /// Slice one page out of `items`. Out-of-range pages yield an empty slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let PageRequest { per_page, page } = self.clamped();
        let start = (page as usize - 1).saturating_mul(per_page as usize);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(per_page as usize).min(items.len());
        &items[start..end]
    }
}
