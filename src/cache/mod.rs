//! # Query Cache
//!
//! One [`LazyResult`] per structurally distinct path. Two handles built
//! independently but spelling the same steps from the same anchor share a
//! key, and therefore share one execution.
//!
//! Entries stay until they are invalidated with [`QueryCache::clear`] or
//! their execution fails.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::model::{NamedNode, Path};
use crate::result::LazyResult;

// ============================================================================
// CacheKey
// ============================================================================

/// Canonical signature of a path: its anchor, then each segment's name
/// and rendered call arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

#[derive(Serialize)]
struct KeyRepr<'a> {
    anchor: String,
    segments: Vec<SegmentRepr<'a>>,
}

#[derive(Serialize)]
struct SegmentRepr<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<Vec<String>>,
}

impl CacheKey {
    pub fn of(path: &Path) -> Self {
        let repr = KeyRepr {
            anchor: path.anchor().to_string(),
            segments: path
                .segments()
                .iter()
                .map(|segment| SegmentRepr {
                    name: &segment.name,
                    args: segment
                        .args
                        .as_ref()
                        .map(|args| args.iter().map(ToString::to_string).collect()),
                })
                .collect(),
        };
        // Serializing strings into JSON cannot fail; the display form is
        // an adequate key should that ever change.
        CacheKey(serde_json::to_string(&repr).unwrap_or_else(|_| path.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// QueryCache
// ============================================================================

/// Shared map from [`CacheKey`] to [`LazyResult`]. Cloning shares the map.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

#[derive(Default)]
pub(crate) struct CacheInner {
    entries: Mutex<HashMap<CacheKey, LazyResult>>,
}

impl CacheInner {
    /// Remove `result` if it is still the entry for `key`. A newer result
    /// created after an invalidation is left alone.
    pub(crate) fn evict(&self, key: &CacheKey, result: &LazyResult) {
        let mut entries = self.entries.lock();
        if entries.get(key).is_some_and(|cached| cached.ptr_eq(result)) {
            entries.remove(key);
            debug!(%key, "evicted failed result");
        }
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The result for `path`, created (but not started) on a miss.
    ///
    /// Check and insert happen under one lock, so concurrent callers with
    /// equal paths always receive the same instance.
    pub fn get_or_create(&self, path: &Path) -> LazyResult {
        let key = CacheKey::of(path);
        let mut entries = self.inner.entries.lock();
        if let Some(result) = entries.get(&key) {
            debug!(%key, "query cache hit");
            return result.clone();
        }

        debug!(%key, "query cache miss");
        let result = LazyResult::new(path.clone(), key.clone(), Arc::downgrade(&self.inner));
        entries.insert(key, result.clone());
        result
    }

    /// Evict every entry, or only those whose query touched `document`.
    ///
    /// Holders of an evicted result keep it; only later lookups miss.
    pub fn clear(&self, document: Option<&NamedNode>) {
        let mut entries = self.inner.entries.lock();
        let before = entries.len();
        match document {
            None => entries.clear(),
            Some(document) => entries.retain(|_, result| !result.touches(document)),
        }
        debug!(
            document = document.map(NamedNode::as_str),
            evicted = before - entries.len(),
            "query cache cleared"
        );
    }

    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.inner.entries.lock().contains_key(&CacheKey::of(path))
    }

    /// Whether both handles share the same map.
    pub fn ptr_eq(&self, other: &QueryCache) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache").field("entries", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::model::Anchor;
    use pretty_assertions::assert_eq;

    fn entry() -> Path {
        Path::new(Anchor::Entry, Arc::new(Settings::default()))
    }

    #[test]
    fn test_key_is_structural() {
        let root = entry();
        let a = root.get("https://ex.org/#this").get("firstName");
        let b = root.resolve(Some("<https://ex.org/#this>.firstName"));
        assert_eq!(CacheKey::of(&a), CacheKey::of(&b));

        // Same steps, independently built settings.
        let c = entry().get("https://ex.org/#this").get("firstName");
        assert_eq!(CacheKey::of(&a), CacheKey::of(&c));
    }

    #[test]
    fn test_key_distinguishes_calls_and_arguments() {
        let me = entry().get("user");
        let keys = [
            CacheKey::of(&me.get("like")),
            CacheKey::of(&me.call("like", vec![])),
            CacheKey::of(&me.call("like", vec!["https://ex.org/a".into()])),
            CacheKey::of(&me.call("like", vec!["https://ex.org/b".into()])),
            CacheKey::of(&me.call("like", vec![1.into()])),
            CacheKey::of(&me.call("like", vec!["1".into()])),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_key_distinguishes_anchors() {
        let settings = Arc::new(Settings::default());
        let user = Path::new(Anchor::User, Arc::clone(&settings)).get("name");
        let entry_user = Path::new(Anchor::Entry, settings).get("user").get("name");
        assert_ne!(CacheKey::of(&user), CacheKey::of(&entry_user));
    }

    #[test]
    fn test_get_or_create_shares_instances() {
        let cache = QueryCache::new();
        let path = entry().get("https://ex.org/#this").get("firstName");

        let first = cache.get_or_create(&path);
        let second = cache.get_or_create(&path.root().get("https://ex.org/#this").get("firstName"));
        assert!(first.ptr_eq(&second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&path));

        cache.clear(None);
        assert!(cache.is_empty());
        assert!(!cache.get_or_create(&path).ptr_eq(&first));
    }

    #[test]
    fn test_evict_ignores_replaced_entries() {
        let cache = QueryCache::new();
        let path = entry().get("https://ex.org/#this").get("name");
        let stale = cache.get_or_create(&path);
        cache.clear(None);
        let fresh = cache.get_or_create(&path);

        cache.inner.evict(stale.key(), &stale);
        assert!(cache.get_or_create(&path).ptr_eq(&fresh));

        cache.inner.evict(fresh.key(), &fresh);
        assert!(cache.is_empty());
    }
}
