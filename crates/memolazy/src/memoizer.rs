//! Identity-keyed memoizer: one shared compute function, one table.

use parking_lot::Mutex;

use memotable::{BoxError, Cache, CacheConfig, Ident, Result};

use crate::stats::CacheStats;

/// Memoizes one function's results keyed by argument identity.
///
/// All operations take `&self`; the engine lives behind a mutex, so the
/// compute function must not call back into the same memoizer.
pub struct Memoizer<V> {
    cache: Mutex<Cache<V>>,
    stats: CacheStats,
}

impl<V> Memoizer<V> {
    /// New memoizer bound to `compute`.
    pub fn new<F>(compute: F) -> Self
    where
        F: FnMut(Ident) -> std::result::Result<V, BoxError> + Send + 'static,
    {
        Memoizer::with_config(CacheConfig::default(), compute)
    }

    /// New memoizer with explicit allocation and growth tuning.
    pub fn with_config<F>(config: CacheConfig, compute: F) -> Self
    where
        F: FnMut(Ident) -> std::result::Result<V, BoxError> + Send + 'static,
    {
        Memoizer {
            cache: Mutex::new(Cache::with_config(config, compute)),
            stats: CacheStats::default(),
        }
    }

    /// Store `value` for `key`, replacing any memoized result.
    pub fn set(&self, key: Ident, value: V) -> Result<()> {
        self.cache.lock().set(key, value)
    }

    /// Drop the entry for `key`, handing its value back. Missing keys are
    /// an error, not a silent no-op.
    pub fn remove(&self, key: Ident) -> Result<V> {
        let value = self.cache.lock().remove(key)?;
        self.stats.record_evictions(1);
        Ok(value)
    }

    /// Whether a result for `key` is memoized.
    pub fn contains(&self, key: Ident) -> bool {
        self.cache.lock().contains(key)
    }

    /// Number of memoized results.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Whether no results are memoized.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Evict entries whose keys `is_live` reports dead; returns how many
    /// went.
    pub fn reap<F>(&self, is_live: F) -> usize
    where
        F: FnMut(Ident) -> bool,
    {
        let evicted = self.cache.lock().reap(is_live);
        self.stats.record_evictions(evicted as u64);
        evicted
    }

    /// Drop every memoized result and reset statistics.
    pub fn clear(&self) {
        self.cache.lock().clear();
        self.stats.reset();
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<V: Clone> Memoizer<V> {
    /// Memoized result for `key`, computing it on first lookup.
    pub fn get(&self, key: Ident) -> Result<V> {
        let mut cache = self.cache.lock();
        if let Some(value) = cache.peek(key) {
            self.stats.record_hit();
            return Ok(value.clone());
        }
        self.stats.record_miss();
        cache.get(key).cloned()
    }
}
