//! Plain identity-keyed mapping over the slot table.

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::ident::Ident;
use crate::table::{Probe, Table};

/// Identity-keyed map: the slot-table engine without a bound compute
/// function. [`Cache`](crate::Cache) layers get-or-compute on top of the
/// same operations.
///
/// Keys are held as non-owning identity tokens; values are owned by the
/// map until evicted or the map is dropped.
pub struct IdentMap<V> {
    pub(crate) table: Table<V>,
}

impl<V> IdentMap<V> {
    /// Empty map; the first allocation is deferred to the first insert.
    pub fn new() -> Self {
        IdentMap::with_config(CacheConfig::default())
    }

    /// Empty map with explicit allocation and growth tuning.
    pub fn with_config(config: CacheConfig) -> Self {
        IdentMap {
            table: Table::new(config),
        }
    }

    /// Stored value for `key`, if present. Pure walk: no mutation, no
    /// growth.
    pub fn get(&self, key: Ident) -> Option<&V> {
        if self.table.capacity() == 0 {
            return None;
        }
        match self.table.probe(key) {
            Probe::Hit(index) => Some(self.table.value(index)),
            Probe::Miss(_) => None,
        }
    }

    /// Store `value` for `key`. Replaces in place on a hit (handing back
    /// the old value); inserts on a miss, growing once the load threshold
    /// is consumed.
    pub fn insert(&mut self, key: Ident, value: V) -> Result<Option<V>> {
        self.table.ensure_allocated()?;
        match self.table.probe(key) {
            Probe::Hit(index) => Ok(Some(self.table.replace(index, value))),
            Probe::Miss(index) => {
                self.table.commit(index, key, value)?;
                Ok(None)
            }
        }
    }

    /// Remove the entry for `key`, handing its value back. A missing key
    /// is a reportable error, never a silent no-op.
    pub fn remove(&mut self, key: Ident) -> Result<V> {
        if self.table.capacity() == 0 {
            return Err(Error::NotFound);
        }
        match self.table.probe(key) {
            Probe::Hit(index) => Ok(self.table.evict(index)),
            Probe::Miss(_) => Err(Error::NotFound),
        }
    }

    /// Whether an entry for `key` is present. Pure walk.
    pub fn contains(&self, key: Ident) -> bool {
        self.get(key).is_some()
    }

    /// Number of live entries, O(1).
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current slot-array capacity (0 before the first insert).
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Evict every entry whose key `is_live` reports dead, returning the
    /// eviction count. Best-effort: never fails.
    pub fn reap<F>(&mut self, is_live: F) -> usize
    where
        F: FnMut(Ident) -> bool,
    {
        self.table.reap(is_live)
    }

    /// Drop every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<V> Default for IdentMap<V> {
    fn default() -> Self {
        IdentMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut map = IdentMap::new();
        let key = Ident::from_raw(0x1000);

        assert!(map.insert(key, "a").unwrap().is_none());
        assert_eq!(map.get(key), Some(&"a"));
        assert_eq!(map.len(), 1);

        assert_eq!(map.remove(key).unwrap(), "a");
        assert!(map.get(key).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = IdentMap::new();
        let key = Ident::from_raw(0x2000);

        map.insert(key, 1u32).unwrap();
        assert_eq!(map.insert(key, 2).unwrap(), Some(1));
        assert_eq!(map.get(key), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_error() {
        let mut map: IdentMap<u32> = IdentMap::new();
        let key = Ident::from_raw(0x3000);

        // before any allocation
        assert!(matches!(map.remove(key), Err(Error::NotFound)));

        map.insert(key, 1).unwrap();
        map.remove(key).unwrap();

        // and after the slot was cleared
        assert!(matches!(map.remove(key), Err(Error::NotFound)));
    }

    #[test]
    fn test_lookups_do_not_allocate() {
        let map: IdentMap<u32> = IdentMap::new();

        assert!(map.get(Ident::from_raw(0x4000)).is_none());
        assert!(!map.contains(Ident::from_raw(0x4000)));
        assert_eq!(map.capacity(), 0);
    }

    #[test]
    fn test_reap_evicts_dead_keys() {
        let mut map = IdentMap::new();
        let keys: Vec<Ident> = (1..=4usize).map(|i| Ident::from_raw(i << 4)).collect();
        for &key in &keys {
            map.insert(key, 0u8).unwrap();
        }

        let survivor = keys[0];
        let evicted = map.reap(|key| key == survivor);

        assert_eq!(evicted, 3);
        assert_eq!(map.len(), 1);
        assert!(map.contains(survivor));
        assert!(!map.contains(keys[1]));
    }

    #[test]
    fn test_identity_not_value_keying() {
        let mut map = IdentMap::new();
        let a = Box::new(42u32);
        let b = Box::new(42u32);

        map.insert(Ident::of(&*a), "a").unwrap();
        map.insert(Ident::of(&*b), "b").unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(Ident::of(&*a)), Some(&"a"));
        assert_eq!(map.get(Ident::of(&*b)), Some(&"b"));
    }
}
