//! Bounded, insertion-ordered cache for derived results.
//!
//! Holds values that are pure functions of the rule corpus (applicable rule
//! lists, materialised level pools). Eviction is first-in-first-out once
//! capacity is reached; the whole cache is cleared when the corpus is
//! reloaded.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A thread-safe FIFO cache with a fixed capacity.
pub struct ResultCache<K, V> {
    inner: Mutex<CacheState<K, V>>,
    capacity: usize,
}

struct CacheState<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> ResultCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    /// Create a cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.state().entries.get(key).cloned()
    }

    /// Insert a value, evicting the oldest entries when over capacity.
    pub fn insert(&self, key: K, value: V) {
        let mut state = self.state();
        if state.entries.insert(key.clone(), value).is_none() {
            state.order.push_back(key);
        }
        while state.entries.len() > self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
        }
    }

    /// Return the cached value or compute, store and return it.
    ///
    /// `compute` runs without the lock held.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    pub fn invalidate(&self, key: &K) -> Option<V> {
        let mut state = self.state();
        let removed = state.entries.remove(key);
        if removed.is_some() {
            state.order.retain(|k| k != key);
        }
        removed
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.entries.clear();
        state.order.clear();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.state().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn insert_and_get() {
        let cache: ResultCache<String, i32> = ResultCache::new(4);
        cache.insert("key".to_string(), 42);
        assert_eq!(cache.get(&"key".to_string()), Some(42));
        assert_eq!(cache.get(&"missing".to_string()), None);
    }

    #[test]
    fn oldest_entry_is_evicted_first() {
        let cache: ResultCache<i32, i32> = ResultCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        cache.insert(3, 30);

        assert!(!cache.contains(&1));
        assert_eq!(cache.get(&2), Some(20));
        assert_eq!(cache.get(&3), Some(30));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn overwriting_keeps_original_position() {
        let cache: ResultCache<i32, i32> = ResultCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        cache.insert(1, 11);
        cache.insert(3, 30);

        assert!(!cache.contains(&1));
        assert_eq!(cache.get(&2), Some(20));
    }

    #[test]
    fn invalidate_removes_entry_and_order_slot() {
        let cache: ResultCache<i32, i32> = ResultCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        assert_eq!(cache.invalidate(&1), Some(10));
        cache.insert(3, 30);

        assert_eq!(cache.get(&2), Some(20));
        assert_eq!(cache.get(&3), Some(30));
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let cache: ResultCache<&str, i32> = ResultCache::new(4);
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            7
        };
        assert_eq!(cache.get_or_insert_with("k", compute), 7);
        assert_eq!(cache.get_or_insert_with("k", compute), 7);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache: ResultCache<i32, i32> = ResultCache::new(4);
        cache.insert(1, 10);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let cache: ResultCache<i32, i32> = ResultCache::new(0);
        cache.insert(1, 10);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.get(&1), Some(10));
    }
}
