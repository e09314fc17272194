//! Cache configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_CAPACITY: usize = 1024;
const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(30);
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(250);
const DEFAULT_INVALIDATE_PAGES: u32 = 5;
const DEFAULT_INVALIDATE_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Maximum number of entries held by the in-process backend.
    pub capacity: usize,
    pub listing_ttl: Duration,
    /// Upper bound for a single get/set/delete before it is treated as failed.
    pub operation_timeout: Duration,
    pub invalidate_pages: u32,
    pub invalidate_page_sizes: Vec<u32>,
    /// Run post-write invalidation on a spawned task instead of inline.
    pub background_invalidation: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: DEFAULT_CAPACITY,
            listing_ttl: DEFAULT_LISTING_TTL,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            invalidate_pages: DEFAULT_INVALIDATE_PAGES,
            invalidate_page_sizes: vec![DEFAULT_INVALIDATE_PAGE_SIZE],
            background_invalidation: true,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            capacity: settings.capacity.get() as usize,
            listing_ttl: Duration::from_secs(u64::from(settings.listing_ttl_secs.get())),
            operation_timeout: Duration::from_millis(u64::from(
                settings.operation_timeout_ms.get(),
            )),
            invalidate_pages: settings.invalidate_pages,
            invalidate_page_sizes: settings
                .invalidate_page_sizes
                .iter()
                .map(|size| size.get())
                .collect(),
            background_invalidation: settings.background_invalidation,
        }
    }
}

impl CacheConfig {
    /// Returns the capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.capacity, 1024);
        assert_eq!(config.listing_ttl, Duration::from_secs(30));
        assert_eq!(config.invalidate_pages, 5);
        assert_eq!(config.invalidate_page_sizes, vec![10]);
        assert!(config.background_invalidation);
    }

    #[test]
    fn capacity_clamps_to_min() {
        let config = CacheConfig {
            capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.capacity_non_zero().get(), 1);
    }
}
