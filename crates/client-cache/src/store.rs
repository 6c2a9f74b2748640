use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Keyed store with expire-after-write semantics.
///
/// Entries become invisible once their deadline passes and are removed
/// lazily on the next lookup for the same key. Writes are plain
/// overwrites, which resets the deadline. There is no background
/// sweeper and no manual eviction.
pub struct ExpiringCache<K, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
}

#[derive(Clone)]
struct Entry<V> {
    expires_at: Instant,
    value: V,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Same as [`ExpiringCache::new`] with a pre-sized backing map.
    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
        }
        // Guard on the deadline so a concurrent overwrite is not lost.
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        let entry = Entry {
            expires_at: Instant::now() + self.ttl,
            value,
        };
        self.entries.insert(key, entry);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_inserted_value() {
        let cache = ExpiringCache::new(Duration::from_secs(60));
        cache.insert("actor", "permit");
        assert_eq!(cache.get(&"actor"), Some("permit"));
    }

    #[test]
    fn expired_entry_is_removed_on_lookup() {
        let cache = ExpiringCache::new(Duration::from_millis(1));
        cache.insert("actor", "permit");
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&"actor").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn overwrite_replaces_value_and_deadline() {
        let cache = ExpiringCache::new(Duration::from_millis(40));
        cache.insert("actor", "deny");
        std::thread::sleep(Duration::from_millis(25));
        cache.insert("actor", "permit");
        std::thread::sleep(Duration::from_millis(25));
        // The first deadline has passed; the overwrite keeps it alive.
        assert_eq!(cache.get(&"actor"), Some("permit"));
    }

    #[test]
    fn missing_key_yields_none() {
        let cache: ExpiringCache<&str, &str> = ExpiringCache::with_capacity(
            Duration::from_secs(60),
            16,
        );
        assert!(cache.get(&"unknown").is_none());
    }
}
