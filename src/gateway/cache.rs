//! In-memory response cache with lazy TTL eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::clock::Clock;

/// A cached payload and when it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub fetched_at_ms: u64,
    /// Payload came from the fallback generator.
    pub simulated: bool,
}

impl<T> CacheEntry<T> {
    /// `now − fetched_at ≤ ttl`. Entries stamped in the future count as fresh.
    pub fn is_fresh(&self, now_ms: u64, ttl: Duration) -> bool {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        now_ms.saturating_sub(self.fetched_at_ms) <= ttl_ms
    }
}

/// Keyed cache owned by one gateway.
///
/// There is no background sweep: an expired entry stays in the map until a
/// lookup finds it stale and removes it.
pub struct ResponseCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Current reading of the injected clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Returns a fresh entry for `key`, evicting it if it has expired.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<CacheEntry<T>> {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now, ttl) => Some(entry.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `payload` stamped with the current time.
    pub fn insert(&self, key: &str, payload: T, simulated: bool) -> CacheEntry<T> {
        let entry = CacheEntry {
            payload,
            fetched_at_ms: self.clock.now_ms(),
            simulated,
        };
        self.entries.lock().insert(key.to_string(), entry.clone());
        entry
    }

    /// Whether an entry (fresh or not) is held for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Number of held entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<T> std::fmt::Debug for ResponseCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.entries.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::clock::ManualClock;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn entry_fresh_up_to_and_including_ttl() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = ResponseCache::new(clock.clone());
        cache.insert("k", 1, false);

        clock.set(60_000);
        assert_eq!(cache.get("k", TTL).map(|e| e.payload), Some(1));

        clock.set(60_001);
        assert!(cache.get("k", TTL).is_none());
    }

    #[test]
    fn expired_entry_evicted_only_on_lookup() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = ResponseCache::new(clock.clone());
        cache.insert("k", "v".to_string(), true);

        clock.advance(Duration::from_secs(3600));
        assert!(cache.contains("k"));
        assert!(cache.get("k", TTL).is_none());
        assert!(!cache.contains("k"));
    }

    #[test]
    fn simulated_flag_is_kept() {
        let cache = ResponseCache::new(Arc::new(ManualClock::new(5)));
        let entry = cache.insert("k", 2.5, true);
        assert!(entry.simulated);
        assert_eq!(entry.fetched_at_ms, 5);
        assert!(cache.get("k", TTL).is_some_and(|e| e.simulated));
    }
}
