//! Typed access to a cache backend that never fails the caller.
//!
//! Every backend error, timeout or undecodable payload is logged and counted,
//! then reported as a miss (reads) or swallowed (writes).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::backend::{CacheBackend, CacheError};

pub const CACHE_HIT_TOTAL: &str = "quire_cache_hit_total";
pub const CACHE_MISS_TOTAL: &str = "quire_cache_miss_total";
pub const CACHE_ERROR_TOTAL: &str = "quire_cache_error_total";

const SOURCE: &str = "cache::json";

#[derive(Clone)]
pub struct JsonCache {
    backend: Option<Arc<dyn CacheBackend>>,
    timeout: Duration,
}

impl JsonCache {
    pub fn new(backend: Arc<dyn CacheBackend>, timeout: Duration) -> Self {
        Self {
            backend: Some(backend),
            timeout,
        }
    }

    /// A cache that misses on every read and ignores every write.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_ref()?;
        let bytes = match self.guarded("get", key, backend.get(key)).await.flatten() {
            Some(bytes) => bytes,
            None => {
                counter!(CACHE_MISS_TOTAL).increment(1);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                counter!(CACHE_HIT_TOTAL).increment(1);
                Some(value)
            }
            Err(err) => {
                let err = CacheError::Codec(err.to_string());
                report("get", key, &err);
                counter!(CACHE_MISS_TOTAL).increment(1);
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        let payload = match serde_json::to_vec(value) {
            Ok(payload) => Bytes::from(payload),
            Err(err) => {
                report("set", key, &CacheError::Codec(err.to_string()));
                return;
            }
        };
        self.guarded("set", key, backend.set(key, payload, ttl)).await;
    }

    /// Returns whether the backend acknowledged the delete.
    pub async fn delete(&self, key: &str) -> bool {
        let Some(backend) = self.backend.as_ref() else {
            return false;
        };
        self.guarded("delete", key, backend.delete(key))
            .await
            .is_some()
    }

    async fn guarded<T, F>(&self, op: &'static str, key: &str, fut: F) -> Option<T>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        let result = match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.timeout)),
        };
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                report(op, key, &err);
                None
            }
        }
    }
}

fn report(op: &'static str, key: &str, err: &CacheError) {
    counter!(CACHE_ERROR_TOTAL, "op" => op).increment(1);
    warn!(
        target_module = SOURCE,
        op,
        key,
        error = %err,
        "Cache operation failed; continuing without cache"
    );
}
