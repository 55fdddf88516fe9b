use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

/// Normalizes free-text search input into a search cache key
pub fn search_key(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Cached value plus the moment it was captured
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    seq: u64,
}

/// In-memory cache with a fixed time-to-live and a maximum entry count
///
/// Stale entries are treated as misses and dropped on lookup. When an insert
/// finds the cache full, the oldest half of the entries (by insertion order) is
/// evicted first.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
    max_entries: usize,
    next_seq: u64,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
            next_seq: 0,
        }
    }

    /// Returns a copy of the cached value if it is still fresh
    pub fn get(&mut self, key: &K) -> Option<V> {
        let fresh = self
            .entries
            .get(key)
            .map(|entry| entry.inserted_at.elapsed() < self.ttl)?;

        if fresh {
            self.entries.get(key).map(|entry| entry.value.clone())
        } else {
            self.entries.remove(key);
            None
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.len() >= self.max_entries {
            self.evict_oldest_half();
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                seq,
            },
        );
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn evict_oldest_half(&mut self) {
        let mut by_age: Vec<(Instant, u64, K)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.inserted_at, entry.seq, key.clone()))
            .collect();
        by_age.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let evict = (self.max_entries / 2).max(1);
        for (_, _, key) in by_age.into_iter().take(evict) {
            self.entries.remove(&key);
        }

        tracing::debug!(
            evicted = evict,
            remaining = self.entries.len(),
            "Cache full, evicted oldest entries"
        );
    }
}
