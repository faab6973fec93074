use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use rand::Rng;

const TTL_JITTER_RATIO: f64 = 0.1;

struct Entry<T> {
    value: T,
    inserted_at_ms: i64,
    expires_at_ms: i64,
}

/// Bounded, TTL-evicted in-process cache. Expiry is jittered so a burst of
/// inserts does not expire as one thundering herd. Owned by the engine;
/// never module state.
pub struct BoundedCache<T: Clone> {
    entries: RwLock<HashMap<String, Entry<T>>>,
    capacity: usize,
    ttl: Duration,
}

impl<T: Clone> BoundedCache<T> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.expires_at_ms <= now_ms() {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: T) {
        let now = now_ms();
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.expires_at_ms > now);

        if entries.len() >= self.capacity {
            // Evict the stalest entry to stay within the bound.
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at_ms)
                .map(|(key, _)| key.clone())
            {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.into(),
            Entry {
                value,
                inserted_at_ms: now,
                expires_at_ms: now + jittered_ttl_ms(self.ttl),
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.write().remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn jittered_ttl_ms(ttl: Duration) -> i64 {
    if ttl.is_zero() {
        return 0;
    }
    let base_ms = ttl.as_millis() as f64;
    let mut rng = rand::rng();
    let factor = rng.random_range(1.0 - TTL_JITTER_RATIO..=1.0 + TTL_JITTER_RATIO);
    (base_ms * factor).round().max(1.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_and_invalidates() {
        let cache: BoundedCache<u32> = BoundedCache::new(8, Duration::from_secs(60));
        cache.insert("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        cache.invalidate("a");
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn capacity_is_enforced() {
        let cache: BoundedCache<u32> = BoundedCache::new(2, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert!(cache.len() <= 2);
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache: BoundedCache<u32> = BoundedCache::new(8, Duration::from_millis(0));
        cache.insert("a", 1);
        assert_eq!(cache.get("a"), None);
    }
}
