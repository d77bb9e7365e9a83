//! Get-or-compute engine over the identity-keyed map.

use crate::config::CacheConfig;
use crate::error::{BoxError, Error, Result};
use crate::ident::Ident;
use crate::map::IdentMap;
use crate::table::Probe;

/// The compute function bound to a cache at construction.
pub type ComputeFn<V> = Box<dyn FnMut(Ident) -> std::result::Result<V, BoxError> + Send>;

/// Identity-keyed cache: repeat lookups return the stored value, first
/// lookups invoke the compute function bound at construction and store
/// its result.
///
/// Keys are compared by identity token only and are not kept alive by the
/// cache; values are owned by the cache until evicted. Dropping the cache
/// releases every stored value and the backing array.
///
/// All mutating operations take `&mut self`, so the compute function can
/// never observe the cache mid-operation; a reentrant compute call is
/// unrepresentable rather than merely forbidden.
pub struct Cache<V> {
    map: IdentMap<V>,
    compute: ComputeFn<V>,
}

impl<V> Cache<V> {
    /// New cache bound to `compute`. The first allocation is deferred to
    /// the first insertion.
    pub fn new<F>(compute: F) -> Self
    where
        F: FnMut(Ident) -> std::result::Result<V, BoxError> + Send + 'static,
    {
        Cache::with_config(CacheConfig::default(), compute)
    }

    /// New cache with explicit allocation and growth tuning.
    pub fn with_config<F>(config: CacheConfig, compute: F) -> Self
    where
        F: FnMut(Ident) -> std::result::Result<V, BoxError> + Send + 'static,
    {
        Cache {
            map: IdentMap::with_config(config),
            compute: Box::new(compute),
        }
    }

    /// Cached value for `key`, computing and storing it on first lookup.
    ///
    /// A failing compute call leaves the table untouched and surfaces as
    /// [`Error::Compute`]. Growth allocation failure after a successful
    /// compute discards the computed value, leaves the prior entries
    /// intact, and surfaces as [`Error::Alloc`].
    pub fn get(&mut self, key: Ident) -> Result<&V> {
        self.map.table.ensure_allocated()?;
        match self.map.table.probe(key) {
            Probe::Hit(index) => Ok(self.map.table.value(index)),
            Probe::Miss(index) => {
                let value = (self.compute)(key).map_err(Error::Compute)?;
                let index = self.map.table.commit(index, key, value)?;
                Ok(self.map.table.value(index))
            }
        }
    }

    /// Stored value for `key` without computing on a miss. Pure walk: no
    /// mutation, no growth.
    pub fn peek(&self, key: Ident) -> Option<&V> {
        self.map.get(key)
    }

    /// Store `value` for `key`, dropping the previous value on a hit or
    /// inserting a new entry (with the same growth trigger as a
    /// compute-miss) otherwise.
    pub fn set(&mut self, key: Ident, value: V) -> Result<()> {
        self.map.insert(key, value).map(|_| ())
    }

    /// Remove the entry for `key`, handing its value back. A missing key
    /// is a reportable error, never a silent no-op.
    pub fn remove(&mut self, key: Ident) -> Result<V> {
        self.map.remove(key)
    }

    /// Whether an entry for `key` is present. Pure walk.
    pub fn contains(&self, key: Ident) -> bool {
        self.map.contains(key)
    }

    /// Number of live entries, O(1).
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Current slot-array capacity (0 before the first insertion).
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Evict every entry whose key `is_live` reports dead, returning the
    /// eviction count. Best-effort: never fails and computes nothing.
    pub fn reap<F>(&mut self, is_live: F) -> usize
    where
        F: FnMut(Ident) -> bool,
    {
        self.map.reap(is_live)
    }

    /// Drop every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
