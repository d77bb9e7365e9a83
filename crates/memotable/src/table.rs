//! Open-addressed slot storage.
//!
//! All entries live directly in one array; collisions are resolved by
//! probing alternate slots rather than chaining. The probe sequence is
//! shared by lookup, insertion, and growth rehash, so any key present in
//! the table is always found along the path it was inserted through.
//! Termination relies on the array never reaching full occupancy, which
//! the usable-capacity bookkeeping enforces.

use std::mem;

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::ident::Ident;

/// High bits of the hash diversify the probe path once low bits collide.
const PERTURB_SHIFT: u32 = 5;

/// One table cell: an identity key and the value stored for it.
#[derive(Debug)]
pub(crate) struct Slot<V> {
    pub(crate) key: Ident,
    pub(crate) value: V,
}

/// Outcome of a probe walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The key occupies this slot index.
    Hit(usize),
    /// The key is absent; this is the first empty slot on its path.
    Miss(usize),
}

/// The backing array plus size bookkeeping. Capacity is always a power of
/// two (zero before the first allocation) and only ever grows.
pub(crate) struct Table<V> {
    slots: Box<[Option<Slot<V>>]>,
    /// Insertions remaining before the next one forces growth.
    usable: usize,
    config: CacheConfig,
}

impl<V> Table<V> {
    /// Empty table; the slot array is not allocated until first use.
    pub(crate) fn new(config: CacheConfig) -> Self {
        config.validate();
        Table {
            slots: Box::default(),
            usable: 0,
            config,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live entry count, derived arithmetically from the usable budget.
    pub(crate) fn len(&self) -> usize {
        self.config.usable_capacity(self.capacity()) - self.usable
    }

    /// Allocate the initial slot array if none exists yet.
    pub(crate) fn ensure_allocated(&mut self) -> Result<()> {
        if self.slots.is_empty() {
            self.slots = alloc_slots(self.config.initial_capacity)?;
            self.usable = self.config.usable_capacity(self.config.initial_capacity);
        }
        Ok(())
    }

    /// Walk the probe sequence for `key`. The table must be allocated.
    pub(crate) fn probe(&self, key: Ident) -> Probe {
        probe_slots(&self.slots, key)
    }

    /// Stored value at `index`; the slot must be occupied.
    pub(crate) fn value(&self, index: usize) -> &V {
        match &self.slots[index] {
            Some(slot) => &slot.value,
            None => unreachable!("probe hit on an empty slot"),
        }
    }

    /// Swap in a new value at the occupied slot `index`, handing back the
    /// old one. The key is left unchanged.
    pub(crate) fn replace(&mut self, index: usize, value: V) -> V {
        match &mut self.slots[index] {
            Some(slot) => mem::replace(&mut slot.value, value),
            None => unreachable!("replace on an empty slot"),
        }
    }

    /// Clear the occupied slot at `index`, handing back its value. The
    /// insertion budget the entry consumed is restored.
    pub(crate) fn evict(&mut self, index: usize) -> V {
        match self.slots[index].take() {
            Some(slot) => {
                self.usable += 1;
                slot.value
            }
            None => unreachable!("evict on an empty slot"),
        }
    }

    /// Write a brand-new entry into the empty slot at `index`, growing
    /// afterwards if the insertion budget is spent. Returns the index the
    /// entry ended up in (growth relocates it).
    ///
    /// If growth allocation fails the entry is rolled back out and the
    /// previous array is left fully intact.
    pub(crate) fn commit(&mut self, index: usize, key: Ident, value: V) -> Result<usize> {
        debug_assert!(self.slots[index].is_none());
        self.slots[index] = Some(Slot { key, value });

        if self.usable == 0 {
            if let Err(e) = self.grow() {
                self.slots[index] = None;
                return Err(e);
            }
            match self.probe(key) {
                Probe::Hit(relocated) => Ok(relocated),
                Probe::Miss(_) => unreachable!("entry lost during growth"),
            }
        } else {
            self.usable -= 1;
            Ok(index)
        }
    }

    /// Clear every occupied slot whose key fails the liveness check.
    /// Returns the eviction count.
    pub(crate) fn reap<F>(&mut self, mut is_live: F) -> usize
    where
        F: FnMut(Ident) -> bool,
    {
        let mut evicted = 0;
        for slot in self.slots.iter_mut() {
            if let Some(entry) = slot {
                if !is_live(entry.key) {
                    *slot = None;
                    self.usable += 1;
                    evicted += 1;
                }
            }
        }
        evicted
    }

    /// Drop every entry and reset the insertion budget. Capacity is kept.
    pub(crate) fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.usable = self.config.usable_capacity(self.capacity());
    }

    /// Re-insert every live entry into an array `growth_factor` times as
    /// large, probing against the new mask. Values are moved, never
    /// recomputed. On allocation failure the current array is untouched.
    fn grow(&mut self) -> Result<()> {
        let new_capacity = self.capacity() * self.config.growth_factor;
        let new_slots = alloc_slots(new_capacity)?;
        let old_slots = mem::replace(&mut self.slots, new_slots);

        let mut live = 0;
        for slot in old_slots.into_vec() {
            if let Some(Slot { key, value }) = slot {
                live += 1;
                match probe_slots(&self.slots, key) {
                    Probe::Miss(index) => self.slots[index] = Some(Slot { key, value }),
                    Probe::Hit(_) => unreachable!("duplicate key during growth"),
                }
            }
        }

        self.usable = self.config.usable_capacity(new_capacity) - live;
        Ok(())
    }
}

/// Fallible allocation of an all-empty slot array.
fn alloc_slots<V>(capacity: usize) -> Result<Box<[Option<Slot<V>>]>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| Error::Alloc(capacity))?;
    slots.resize_with(capacity, || None);
    Ok(slots.into_boxed_slice())
}

/// The perturbation probe walk: start at `hash & mask`, then
/// `i = i*5 + perturb + 1` with `perturb` consumed five bits per round.
///
/// Once `perturb` is exhausted the recurrence cycles through every index,
/// so an empty slot is always reached within `capacity` plus a word's
/// worth of steps; running past that bound means the table has no empty
/// slot, which the insertion budget rules out.
fn probe_slots<V>(slots: &[Option<Slot<V>>], key: Ident) -> Probe {
    debug_assert!(!slots.is_empty());
    let mask = slots.len() - 1;
    let hash = key.hash();

    let mut i = hash & mask;
    let mut perturb = hash;

    for _ in 0..slots.len() + usize::BITS as usize {
        match &slots[i & mask] {
            Some(slot) if slot.key == key => return Probe::Hit(i & mask),
            None => return Probe::Miss(i & mask),
            Some(_) => {}
        }
        i = i.wrapping_mul(5).wrapping_add(perturb).wrapping_add(1);
        perturb >>= PERTURB_SHIFT;
    }

    panic!("probe sequence did not terminate: table has no empty slot");
}
