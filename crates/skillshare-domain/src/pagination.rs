//! Pagination request and response metadata.

use serde::{Deserialize, Serialize};

/// Pagination parameters shared across list endpoints.
///
/// - `limit`: 1–100, default 10
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_limit() -> u32 {
    10
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    pub const MAX_LIMIT: u32 = 100;

    /// Clamp `limit` to the valid range 1–100 and `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, Self::MAX_LIMIT),
            page: self.page.max(1),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Pagination metadata returned next to a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total_items: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(total_items: u64, page: PageRequest) -> Self {
        let per_page = page.limit.max(1);
        Self {
            total_items,
            per_page,
            current_page: page.page,
            total_pages: total_items.div_ceil(u64::from(per_page)),
        }
    }
}

/// A page of items with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
