use crate::types::PackageInfo;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default maximum age of a cached result set.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Default maximum number of cached queries.
pub const DEFAULT_CAPACITY: usize = 100;

/// Cached result set with its creation instant.
///
/// The results are wrapped in `Arc` so that a cache hit is a reference-count
/// increment, not a copy of every record.
///
/// # Examples
///
/// ```
/// use pkgsearch_core::cache::CacheEntry;
/// use std::sync::Arc;
/// use std::time::Instant;
///
/// let entry = CacheEntry {
///     results: Arc::from(Vec::new()),
///     created_at: Instant::now(),
/// };
///
/// let cloned = entry.clone();
/// assert!(Arc::ptr_eq(&entry.results, &cloned.results));
/// ```
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub results: Arc<[PackageInfo]>,
    pub created_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < ttl
    }
}

/// Query result cache with a time-to-live and a size bound.
///
/// Keys are normalized (trimmed, lower-cased) query strings. An entry is
/// valid for exactly one TTL window from its creation; expired entries are
/// removed lazily when looked up. When the cache is full, the oldest 20% of
/// entries are evicted in one batch before the next insert of a new key;
/// overwriting an existing key never evicts.
///
/// Backed by a sharded `DashMap`, so lookups for unrelated queries never
/// contend on a single lock. The capacity check and the insert are not one
/// atomic step: with `n` writers racing the boundary, `len()` can briefly
/// reach `capacity + n - 1` until the next insert compacts it again.
///
/// # Examples
///
/// ```
/// use pkgsearch_core::{PackageInfo, Registry, ResultCache};
///
/// let cache = ResultCache::new();
/// cache.put("React", vec![PackageInfo::new(Registry::Npm, "react", "18.2.0")]);
///
/// let hit = cache.try_get("  react ").unwrap();
/// assert_eq!(hit[0].name, "react");
/// ```
#[derive(Debug)]
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
}

impl ResultCache {
    /// Creates a cache with a 10 minute TTL holding up to 100 queries.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    /// Creates a cache with custom limits. A zero capacity is treated as one.
    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Looks up results for `query`.
    ///
    /// Returns `None` on a miss. An expired entry is evicted and reported as
    /// a miss.
    pub fn try_get(&self, query: &str) -> Option<Arc<[PackageInfo]>> {
        let key = normalize_key(query);
        if key.is_empty() {
            return None;
        }

        let now = Instant::now();
        match self.entries.get(&key) {
            None => return None,
            Some(entry) if entry.is_fresh(self.ttl, now) => {
                tracing::debug!(query = %key, "cache hit");
                return Some(Arc::clone(&entry.results));
            }
            Some(_) => {}
        }

        // Only drop the entry if it is still the stale one; a concurrent put
        // may have replaced it since the read above.
        let ttl = self.ttl;
        if self
            .entries
            .remove_if(&key, |_, entry| !entry.is_fresh(ttl, now))
            .is_some()
        {
            tracing::debug!(query = %key, "cache entry expired");
        }
        None
    }

    /// Stores `results` for `query`, replacing any existing entry.
    ///
    /// Blank queries are ignored.
    pub fn put(&self, query: &str, results: impl Into<Arc<[PackageInfo]>>) {
        let key = normalize_key(query);
        if key.is_empty() {
            return;
        }

        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.evict_oldest();
        }

        let results = results.into();
        tracing::debug!(query = %key, count = results.len(), "caching results");
        self.entries.insert(
            key,
            CacheEntry {
                results,
                created_at: Instant::now(),
            },
        );
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
        tracing::debug!("cache cleared");
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Evicts the oldest 20% of entries (at least one) by creation time.
    fn evict_oldest(&self) {
        let target_removals = (self.capacity / 5).max(1);

        let mut by_age: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();
        by_age.sort_by_key(|(_, created_at)| *created_at);

        let mut removed = 0;
        for (key, _) in by_age.into_iter().take(target_removals) {
            if self.entries.remove(&key).is_some() {
                removed += 1;
            }
        }

        tracing::debug!(removed, "evicted oldest cache entries");
    }

    #[doc(hidden)]
    pub fn insert_for_bench(&self, query: &str, entry: CacheEntry) {
        self.entries.insert(normalize_key(query), entry);
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes a query string into its cache key.
pub fn normalize_key(query: &str) -> String {
    query.trim().to_lowercase()
}
