//! In-memory cache of query results and the invalidation seam used after writes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

/// Something whose cached reads can be marked stale.
///
/// Implementations must be idempotent and safe to call from many
/// coordinators at once.
pub trait Invalidate: Send + Sync {
    fn invalidate(&self, params: &Value);
}

/// A cached read to refresh after a successful write.
#[derive(Clone)]
pub struct InvalidationTarget {
    query: Arc<dyn Invalidate>,
    params: Value,
}

impl InvalidationTarget {
    pub fn new(query: Arc<dyn Invalidate>, params: Value) -> Self {
        Self { query, params }
    }

    pub fn run(&self) {
        self.query.invalidate(&self.params);
    }
}

impl fmt::Debug for InvalidationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvalidationTarget")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    query: String,
    params: String,
}

impl QueryKey {
    fn new(query: &str, params: &Value) -> Self {
        Self {
            query: query.to_string(),
            params: params.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stale: bool,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryKey, CacheEntry>,
    invalidations: HashMap<QueryKey, u64>,
}

/// Shared query cache. Cloning yields another handle to the same cache.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<RwLock<CacheInner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for one named query (e.g. `"mailbox.get"`).
    pub fn query(&self, name: impl Into<String>) -> CachedQuery {
        CachedQuery {
            cache: self.clone(),
            name: name.into(),
        }
    }
}

/// Handle to one named query inside a [`QueryCache`].
#[derive(Clone)]
pub struct CachedQuery {
    cache: QueryCache,
    name: String,
}

impl CachedQuery {
    /// Stores a fresh result for `params`.
    pub fn set(&self, params: &Value, value: Value) {
        let key = QueryKey::new(&self.name, params);
        let entry = CacheEntry {
            value,
            stale: false,
        };
        self.cache.inner.write().entries.insert(key, entry);
    }

    pub fn get(&self, params: &Value) -> Option<Value> {
        let key = QueryKey::new(&self.name, params);
        self.cache
            .inner
            .read()
            .entries
            .get(&key)
            .map(|entry| entry.value.clone())
    }

    /// True when a cached value exists and has been invalidated since it was set.
    pub fn is_stale(&self, params: &Value) -> bool {
        let key = QueryKey::new(&self.name, params);
        self.cache
            .inner
            .read()
            .entries
            .get(&key)
            .is_some_and(|entry| entry.stale)
    }

    /// Number of invalidations received for `params`.
    pub fn invalidations(&self, params: &Value) -> u64 {
        let key = QueryKey::new(&self.name, params);
        self.cache
            .inner
            .read()
            .invalidations
            .get(&key)
            .copied()
            .unwrap_or(0)
    }
}

impl Invalidate for CachedQuery {
    fn invalidate(&self, params: &Value) {
        let key = QueryKey::new(&self.name, params);
        let mut inner = self.cache.inner.write();
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.stale = true;
        }
        *inner.invalidations.entry(key).or_insert(0) += 1;
        tracing::debug!(query = %self.name, params = %params, "Query invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_is_fresh() {
        let cache = QueryCache::new();
        let query = cache.query("mailbox.get");
        let params = json!({"mailboxSlug": "gumroad"});

        query.set(&params, json!({"name": "Gumroad"}));

        assert_eq!(query.get(&params), Some(json!({"name": "Gumroad"})));
        assert!(!query.is_stale(&params));
    }

    #[test]
    fn invalidate_marks_only_matching_params() {
        let cache = QueryCache::new();
        let query = cache.query("mailbox.get");
        let a = json!({"mailboxSlug": "a"});
        let b = json!({"mailboxSlug": "b"});
        query.set(&a, json!(1));
        query.set(&b, json!(2));

        query.invalidate(&a);

        assert!(query.is_stale(&a));
        assert!(!query.is_stale(&b));
        assert_eq!(query.invalidations(&a), 1);
        assert_eq!(query.invalidations(&b), 0);
    }

    #[test]
    fn invalidate_is_idempotent() {
        let cache = QueryCache::new();
        let query = cache.query("mailbox.get");
        let params = json!({"mailboxSlug": "a"});
        query.set(&params, json!(1));

        query.invalidate(&params);
        query.invalidate(&params);

        assert!(query.is_stale(&params));
        assert_eq!(query.get(&params), Some(json!(1)));
        assert_eq!(query.invalidations(&params), 2);
    }

    #[test]
    fn handles_share_one_cache() {
        let cache = QueryCache::new();
        let params = json!({"mailboxSlug": "a"});
        cache.query("mailbox.get").set(&params, json!(1));
        cache.query("mailbox.get").invalidate(&params);
        assert!(cache.query("mailbox.get").is_stale(&params));
        assert!(!cache.query("mailbox.list").is_stale(&params));
    }

    #[test]
    fn target_runs_its_query() {
        let cache = QueryCache::new();
        let query = cache.query("mailbox.get");
        let params = json!({"mailboxSlug": "a"});
        let target = InvalidationTarget::new(Arc::new(query.clone()), params.clone());

        target.run();

        assert_eq!(query.invalidations(&params), 1);
    }
}
