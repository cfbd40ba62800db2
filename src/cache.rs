// Bounded in-memory cache with first-in-first-out eviction.
//
// Entries are kept in insertion order. Reads never touch that order, so the
// entry evicted at capacity is always the oldest inserted one, however often
// it has been read since.

use indexmap::IndexMap;
use std::hash::Hash;
use tracing::debug;

/// Capacity used by the resolver when none is configured.
pub const DEFAULT_CAPACITY: usize = 100;

/// Fixed-capacity key/value store with FIFO eviction.
///
/// Overwriting a key that is already present replaces the value in place:
/// the key keeps its original insertion slot and nothing is evicted.
#[derive(Debug, Clone)]
pub struct BoundedCache<K, V> {
    entries: IndexMap<K, V>,
    capacity: usize,
}

impl<K: Hash + Eq, V> BoundedCache<K, V> {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`. Inserting a new key while full evicts the
    /// oldest entry first; the evicted pair is returned.
    ///
    /// Overwriting never evicts. A plain "evict when full, then write" would
    /// drop the oldest entry even when re-setting a key already present;
    /// this cache does not.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0)
        } else {
            None
        };
        if evicted.is_some() {
            debug!(capacity = self.capacity, "cache full, evicted oldest entry");
        }

        self.entries.insert(key, value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}

impl<K: Hash + Eq, V> Default for BoundedCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn evicts_first_inserted_key_past_capacity() {
        let mut cache = BoundedCache::new(3);
        for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
            cache.set(key, i);
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&1));
        assert_eq!(cache.get(&"c"), Some(&2));
        assert_eq!(cache.get(&"d"), Some(&3));
    }

    #[test]
    fn reads_do_not_refresh_recency() {
        let mut cache = BoundedCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));

        let evicted = cache.set("c", 3);

        assert_eq!(evicted, Some(("a", 1)));
        assert!(!cache.contains(&"a"));
    }

    #[test]
    fn missing_key_leaves_contents_untouched() {
        let mut cache = BoundedCache::new(2);
        cache.set("a", 1);

        assert_eq!(cache.get(&"zzz"), None);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn overwrite_keeps_slot_and_does_not_evict() {
        let mut cache = BoundedCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);

        assert_eq!(cache.set("a", 10), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(&10));

        // "a" still holds the oldest slot, so it goes first.
        cache.set("c", 3);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_holds_one_entry() {
        let mut cache = BoundedCache::new(0);
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["b"]);
    }
}
