//! Per-owner lazily-computed values.

use parking_lot::Mutex;

use memotable::{BoxError, CacheConfig, Error, Ident, IdentMap, Result};

use crate::stats::CacheStats;

/// The producer bound to a [`LazyField`].
pub type ProduceFn<T, V> = Box<dyn Fn(&T) -> std::result::Result<V, BoxError> + Send + Sync>;

/// One lazily-computed field: memoizes a producer's result per owning
/// object, keyed by the owner's identity.
///
/// The field does not keep owners alive and cannot observe their drop; a
/// new object at a dropped owner's address would read the stale entry.
/// Callers that drop owners should [`invalidate`](LazyField::invalidate)
/// eagerly or [`reap`](LazyField::reap) with a liveness check.
///
/// All operations take `&self`; the producer must not call back into the
/// same field.
pub struct LazyField<T, V> {
    produce: ProduceFn<T, V>,
    entries: Mutex<IdentMap<V>>,
    stats: CacheStats,
}

impl<T, V> LazyField<T, V> {
    /// New field bound to `produce`.
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<V, BoxError> + Send + Sync + 'static,
    {
        LazyField::with_config(CacheConfig::default(), produce)
    }

    /// New field with explicit allocation and growth tuning.
    pub fn with_config<F>(config: CacheConfig, produce: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<V, BoxError> + Send + Sync + 'static,
    {
        LazyField {
            produce: Box::new(produce),
            entries: Mutex::new(IdentMap::with_config(config)),
            stats: CacheStats::default(),
        }
    }

    /// Replace the memoized value for `owner` without producing.
    pub fn set(&self, owner: &T, value: V) -> Result<()> {
        self.entries.lock().insert(Ident::of(owner), value)?;
        Ok(())
    }

    /// Drop the memoized value for `owner`, handing it back; the next
    /// access produces again. Absent entries are an error.
    pub fn invalidate(&self, owner: &T) -> Result<V> {
        let value = self.entries.lock().remove(Ident::of(owner))?;
        self.stats.record_evictions(1);
        Ok(value)
    }

    /// Whether a value is memoized for `owner`.
    pub fn is_cached(&self, owner: &T) -> bool {
        self.entries.lock().contains(Ident::of(owner))
    }

    /// Number of owners with a memoized value.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no owner has a memoized value.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Evict entries whose owner `is_live` reports dead; returns how many
    /// went.
    pub fn reap<F>(&self, is_live: F) -> usize
    where
        F: FnMut(Ident) -> bool,
    {
        let evicted = self.entries.lock().reap(is_live);
        self.stats.record_evictions(evicted as u64);
        evicted
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<T, V: Clone> LazyField<T, V> {
    /// The memoized value for `owner`, produced and stored on first
    /// access. A failing producer leaves no entry behind.
    pub fn get(&self, owner: &T) -> Result<V> {
        let key = Ident::of(owner);
        let mut entries = self.entries.lock();
        if let Some(value) = entries.get(key) {
            self.stats.record_hit();
            return Ok(value.clone());
        }
        self.stats.record_miss();
        let value = (self.produce)(owner).map_err(Error::Compute)?;
        entries.insert(key, value.clone())?;
        Ok(value)
    }
}
