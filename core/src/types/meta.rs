use serde::{Deserialize, Serialize};

/// Pagination envelope attached to list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub total_count: Option<u64>,
    /// URL of the next page; empty or absent on the last page.
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl Metadata {
    /// `true` when there is no next page. `null` and `""` both mean "none".
    pub fn is_last_page(&self) -> bool {
        self.next.as_deref().map_or(true, str::is_empty)
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<Metadata>,
    pub last_page: bool,
}

impl<T> Page<T> {
    /// A response without a `meta` envelope has nothing after it.
    pub fn new(items: Vec<T>, meta: Option<Metadata>) -> Self {
        let last_page = meta.as_ref().map_or(true, Metadata::is_last_page);
        Self {
            items,
            meta,
            last_page,
        }
    }
}
