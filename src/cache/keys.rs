//! Cache key definitions for post listings.

use std::fmt;

use crate::application::pagination::PageParams;

/// Addresses one cached listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingKey {
    pub page: u32,
    pub limit: u32,
}

impl ListingKey {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl From<PageParams> for ListingKey {
    fn from(params: PageParams) -> Self {
        Self::new(params.page(), params.limit())
    }
}

impl fmt::Display for ListingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "posts:page:{}:limit:{}", self.page, self.limit)
    }
}

/// Keys dropped after a post write: pages `1..=pages` for every size in `page_sizes`.
///
/// Pages past the window and sizes outside the list are left to expire on their TTL.
pub fn invalidation_window(pages: u32, page_sizes: &[u32]) -> Vec<ListingKey> {
    page_sizes
        .iter()
        .flat_map(|&limit| (1..=pages).map(move |page| ListingKey::new(page, limit)))
        .collect()
}
