//! Cache-aside reads of the paginated post listing and their invalidation.
//!
//! A page is served from the cache while its entry lives. On a miss the page
//! is computed from the store (newest first, tombstones excluded) and written
//! back with the listing TTL.
//!
//! Writes drop a fixed window of keys: pages `1..=invalidate_pages` for each
//! configured page size. Other keys keep serving what they hold until their
//! TTL runs out, so a listing requested with an uncommon size or past the
//! window can lag the store by at most one TTL. A reader that misses just
//! before a write and fills just after it can also re-populate a stale page;
//! the TTL bounds that window too.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::application::pagination::PageParams;
use crate::application::repos::{PostsRepo, RepoError};
use crate::cache::{CacheConfig, JsonCache, ListingKey, invalidation_window};
use crate::domain::entities::PostRecord;

pub const LISTING_INVALIDATED_KEYS_TOTAL: &str = "quire_listing_invalidated_keys_total";

#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSource {
    Cache,
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostListing {
    pub from: ListingSource,
    pub page: u32,
    pub limit: u32,
    pub posts: Vec<PostRecord>,
}

/// Which write triggered an invalidation; only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostWrite {
    Created,
    Updated,
    Deleted,
}

impl PostWrite {
    pub fn as_str(self) -> &'static str {
        match self {
            PostWrite::Created => "created",
            PostWrite::Updated => "updated",
            PostWrite::Deleted => "deleted",
        }
    }
}

#[derive(Clone)]
pub struct ListingService {
    posts: Arc<dyn PostsRepo>,
    cache: JsonCache,
    ttl: Duration,
    window: Arc<[ListingKey]>,
    background_invalidation: bool,
}

impl ListingService {
    pub fn new(posts: Arc<dyn PostsRepo>, cache: JsonCache, config: &CacheConfig) -> Self {
        Self {
            posts,
            cache,
            ttl: config.listing_ttl,
            window: invalidation_window(config.invalidate_pages, &config.invalidate_page_sizes)
                .into(),
            background_invalidation: config.background_invalidation,
        }
    }

    pub async fn list(&self, params: PageParams) -> Result<PostListing, ListingError> {
        let key = ListingKey::from(params).to_string();

        if let Some(posts) = self.cache.get::<Vec<PostRecord>>(&key).await {
            return Ok(listing(ListingSource::Cache, params, posts));
        }

        let posts = self.posts.list_posts(params.offset(), params.limit()).await?;
        self.cache.set(&key, &posts, self.ttl).await;

        Ok(listing(ListingSource::Store, params, posts))
    }

    /// Drop every key in the invalidation window; returns how many the cache acknowledged.
    pub async fn invalidate(&self) -> usize {
        if !self.cache.is_enabled() {
            return 0;
        }
        let mut removed = 0;
        for key in self.window.iter() {
            if self.cache.delete(&key.to_string()).await {
                removed += 1;
            }
        }
        counter!(LISTING_INVALIDATED_KEYS_TOTAL).increment(removed as u64);
        removed
    }

    /// Invalidate after a committed write, on a spawned task unless configured inline.
    pub async fn post_written(&self, write: PostWrite) {
        if self.background_invalidation {
            let service = self.clone();
            tokio::spawn(async move {
                let removed = service.invalidate().await;
                log_invalidation(write, removed);
            });
        } else {
            let removed = self.invalidate().await;
            log_invalidation(write, removed);
        }
    }
}

fn listing(from: ListingSource, params: PageParams, posts: Vec<PostRecord>) -> PostListing {
    PostListing {
        from,
        page: params.page(),
        limit: params.limit(),
        posts,
    }
}

fn log_invalidation(write: PostWrite, removed: usize) {
    debug!(
        target = "application::listing::post_written",
        write = write.as_str(),
        removed,
        "listing cache invalidated"
    );
}
