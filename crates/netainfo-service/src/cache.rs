//! The in-memory cache of computed aggregations.
//!
//! Entries expire a fixed time after they were computed, independent of how often they are read.
//! When more distinct keys than the configured capacity are cached, the least recently used entry
//! is evicted. Concurrent lookups of the same missing key are coalesced, so that only a single
//! computation runs while the other callers wait for its result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::policy::EvictionPolicy;

use crate::aggregation::{Aggregation, AggregationKey};
use crate::config::AggregationCacheConfig;

type InMemoryCache = moka::future::Cache<AggregationKey, Arc<Aggregation>>;

/// Counters of cache lookups.
#[derive(Debug, Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// A snapshot of the cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// Memoizes [`Aggregation`]s per [`AggregationKey`].
///
/// Cloning is cheap and yields a handle to the same underlying cache.
#[derive(Clone)]
pub struct AggregationCache {
    cache: InMemoryCache,
    counters: Arc<CacheCounters>,
}

impl std::fmt::Debug for AggregationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationCache")
            .field("in-memory items", &self.cache.entry_count())
            .field("counters", &self.counters)
            .finish()
    }
}

impl AggregationCache {
    pub fn new(config: AggregationCacheConfig) -> Self {
        let cache = InMemoryCache::builder()
            .name("aggregations")
            .max_capacity(config.capacity)
            .time_to_live(config.ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self {
            cache,
            counters: Default::default(),
        }
    }

    /// Returns the cached aggregation for `key`, invoking `compute` if there is none or it expired.
    pub async fn get_or_compute<F>(&self, key: AggregationKey, compute: F) -> Arc<Aggregation>
    where
        F: FnOnce(&AggregationKey) -> Aggregation,
    {
        let init = async move { Arc::new(compute(&key)) };
        let entry = self.cache.entry(key).or_insert_with(init).await;

        if entry.is_fresh() {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            metric!(counter("aggregation.cache.miss") += 1);
            tracing::debug!(%key, "computed aggregation for cache miss");

            // applies pending evictions, so the capacity holds once the insert returns
            self.cache.run_pending_tasks().await;
        } else {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            metric!(counter("aggregation.cache.hit") += 1);
        }

        entry.into_value()
    }

    /// Whether `key` currently has a live entry, without touching its recency.
    pub fn contains(&self, key: &AggregationKey) -> bool {
        self.cache.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}
