//! Read-through cache for post listings.
//!
//! - `CacheBackend` is the raw key/value contract with per-entry TTL.
//! - `MemoryCache` is the in-process backend (bounded LRU).
//! - `JsonCache` adds serde encoding, per-operation timeouts and graceful
//!   degradation: the cache can slow nothing down and fail nothing.
//!
//! ```toml
//! [cache]
//! enabled = true
//! capacity = 1024
//! listing_ttl_secs = 30
//! invalidate_pages = 5
//! invalidate_page_sizes = [10]
//! ```

mod backend;
mod config;
mod json;
mod keys;
mod lock;
mod memory;

use std::sync::Arc;

pub use backend::{CacheBackend, CacheError};
pub use config::CacheConfig;
pub use json::{CACHE_ERROR_TOTAL, CACHE_HIT_TOTAL, CACHE_MISS_TOTAL, JsonCache};
pub use keys::{ListingKey, invalidation_window};
pub use memory::MemoryCache;

/// Build the cache described by `config`.
pub fn build(config: &CacheConfig) -> JsonCache {
    if !config.enabled {
        return JsonCache::disabled();
    }
    let backend = Arc::new(MemoryCache::new(config.capacity_non_zero()));
    JsonCache::new(backend, config.operation_timeout)
}
