use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const DEFAULT_TTL_SECS: u64 = 300;

/// Fixed-TTL get-or-compute store. Every derived table in the pipeline is
/// rebuilt from scratch, so callers key entries by their input identity (the
/// source URL) and let stale values fall out on the next read.
pub struct TtlCache<V: Clone> {
    ttl: Duration,
    entries: Mutex<HashMap<String, (V, Instant)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(default_ttl())
    }

    pub fn get_or_compute(&self, key: &str, compute: impl FnOnce() -> V) -> V {
        {
            let entries = self.entries.lock().expect("page cache lock poisoned");
            if let Some((value, stored_at)) = entries.get(key) {
                if stored_at.elapsed() < self.ttl {
                    return value.clone();
                }
            }
        }

        let value = compute();
        let mut entries = self.entries.lock().expect("page cache lock poisoned");
        entries.insert(key.to_string(), (value.clone(), Instant::now()));
        value
    }

    /// Drops every entry so the next read recomputes. Used by manual refresh.
    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("page cache lock poisoned")
            .clear();
    }
}

pub fn default_ttl() -> Duration {
    let secs = std::env::var("PAGE_CACHE_TTL_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TTL_SECS);
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn second_read_within_ttl_reuses_value() {
        let cache = TtlCache::new(Duration::from_secs(3600));
        let calls = AtomicU32::new(0);

        let first = cache.get_or_compute("k", || {
            calls.fetch_add(1, Ordering::SeqCst);
            41
        });
        let second = cache.get_or_compute("k", || {
            calls.fetch_add(1, Ordering::SeqCst);
            42
        });

        assert_eq!(first, 41);
        assert_eq!(second, 41);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_ttl_always_recomputes() {
        let cache = TtlCache::new(Duration::ZERO);
        assert_eq!(cache.get_or_compute("k", || 1), 1);
        assert_eq!(cache.get_or_compute("k", || 2), 2);
    }

    #[test]
    fn clear_forgets_entries() {
        let cache = TtlCache::new(Duration::from_secs(3600));
        assert_eq!(cache.get_or_compute("k", || 1), 1);
        cache.clear();
        assert_eq!(cache.get_or_compute("k", || 2), 2);
    }
}
