//! LongHashMap: open-addressing table from `i64` keys to values.
//!
//! Placement uses the double-hashing probe of `probe.rs` driven by two
//! per-instance seeds. Values live in a slotmap arena; the slot table holds
//! `(key, handle)` pairs. There is no removal, so reaching an empty slot
//! while probing proves the key is absent. Adding removal would require
//! tombstones and a lookup that continues past them.

use crate::config::{self, TableConfig, Validated, DEFAULT_LOAD_FACTOR, MAXIMUM_CAPACITY};
use crate::error::{CapacityError, ConcurrentModificationError, ConfigError};
use crate::fail_fast::ModCount;
use crate::hash_family::HashFamily;
use crate::iter::{Iter, Keys, Values};
use crate::probe::{Geometry, ProbeSequence};
use crate::slots::{Slot, SlotTable};
use core::fmt::{self, Debug};
use rand::RngCore;
use slotmap::{DefaultKey, SlotMap};

/// Outcome of probing for a key.
enum Lookup {
    Found(DefaultKey),
    Vacant(usize),
    /// Every slot was visited and none matched or was empty.
    Exhausted,
}

/// Counters describing table geometry and growth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableStats {
    pub len: usize,
    pub capacity: usize,
    pub threshold: usize,
    /// Completed doublings since construction.
    pub resizes: u64,
    /// Inserts that pushed `len` past the threshold while the table was
    /// already at its capacity ceiling and could not grow.
    pub saturated_inserts: u64,
    pub modification_count: u64,
}

#[derive(Clone)]
pub struct LongHashMap<V> {
    first: HashFamily,
    second: HashFamily,
    geometry: Geometry,
    slots: SlotTable,
    values: SlotMap<DefaultKey, V>,
    load_factor: f64,
    threshold: usize,
    max_capacity: usize,
    mod_count: ModCount,
    resizes: u64,
    saturated_inserts: u64,
}

impl<V> LongHashMap<V> {
    /// Creates an empty table with 16 slots and load factor 0.75.
    pub fn new() -> Self {
        Self::with_capacity(config::DEFAULT_CAPACITY)
    }

    /// Creates an empty table with at least `capacity` slots (rounded up to a
    /// power of two, clamped to `MAXIMUM_CAPACITY`) and the default load factor.
    pub fn with_capacity(capacity: usize) -> Self {
        let validated = Validated {
            geometry: Geometry::for_capacity(capacity.min(MAXIMUM_CAPACITY)),
            load_factor: DEFAULT_LOAD_FACTOR,
            max_capacity: MAXIMUM_CAPACITY,
        };
        Self::from_validated(validated, &mut rand::rng())
    }

    pub fn with_capacity_and_load_factor(
        capacity: isize,
        load_factor: f64,
    ) -> Result<Self, ConfigError> {
        Self::with_config(
            TableConfig::new()
                .initial_capacity(capacity)
                .load_factor(load_factor),
        )
    }

    pub fn with_config(config: TableConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_rng(config, &mut rand::rng())
    }

    /// Builds a table whose two hash seeds are drawn from `rng`.
    ///
    /// The draws are independent `next_u64` calls; the seeds then stay fixed
    /// for the table's lifetime, across resizes.
    pub fn with_config_and_rng<R>(config: TableConfig, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: RngCore + ?Sized,
    {
        let validated = config.validate()?;
        Ok(Self::from_validated(validated, rng))
    }

    fn from_validated<R: RngCore + ?Sized>(v: Validated, rng: &mut R) -> Self {
        let first = HashFamily::from_rng(rng);
        let second = HashFamily::from_rng(rng);
        let capacity = v.geometry.capacity();
        Self {
            first,
            second,
            geometry: v.geometry,
            slots: SlotTable::new(capacity),
            values: SlotMap::with_key(),
            load_factor: v.load_factor,
            threshold: config::threshold(capacity, v.load_factor),
            max_capacity: v.max_capacity,
            mod_count: ModCount::new(),
            resizes: 0,
            saturated_inserts: 0,
        }
    }

    /// Number of distinct keys inserted.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of slots in the backing array (always a power of two).
    pub fn capacity(&self) -> usize {
        self.geometry.capacity()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    pub fn modification_count(&self) -> u64 {
        self.mod_count.get()
    }

    /// True once the table sits at its capacity ceiling with more entries
    /// than its threshold; probe chains grow with every further insert.
    pub fn is_saturated(&self) -> bool {
        self.capacity() >= self.max_capacity && self.len() > self.threshold
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            len: self.len(),
            capacity: self.capacity(),
            threshold: self.threshold,
            resizes: self.resizes,
            saturated_inserts: self.saturated_inserts,
            modification_count: self.mod_count.get(),
        }
    }

    #[inline]
    fn probe(&self, key: i64) -> ProbeSequence {
        ProbeSequence::new(key, &self.first, &self.second, self.geometry)
    }

    fn lookup(&self, key: i64) -> Lookup {
        for idx in self.probe(key) {
            match self.slots.get(idx) {
                Slot::Empty => return Lookup::Vacant(idx),
                Slot::Occupied { key: k, handle } if k == key => return Lookup::Found(handle),
                Slot::Occupied { .. } => {}
            }
        }
        Lookup::Exhausted
    }

    pub fn get(&self, key: i64) -> Option<&V> {
        match self.lookup(key) {
            Lookup::Found(handle) => self.values.get(handle),
            Lookup::Vacant(_) | Lookup::Exhausted => None,
        }
    }

    pub fn get_mut(&mut self, key: i64) -> Option<&mut V> {
        match self.lookup(key) {
            Lookup::Found(handle) => self.values.get_mut(handle),
            Lookup::Vacant(_) | Lookup::Exhausted => None,
        }
    }

    pub fn contains_key(&self, key: i64) -> bool {
        matches!(self.lookup(key), Lookup::Found(_))
    }

    /// Inserts or replaces the value for `key`, returning the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `key` is new and every slot is taken, which can only happen
    /// once the table has reached its capacity ceiling. Use `try_put` to
    /// handle that case.
    pub fn put(&mut self, key: i64, value: V) -> Option<V> {
        self.try_put(key, value).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// Replacing an existing key writes the value in place and does not
    /// count as a structural modification. A new key bumps the modification
    /// count and grows the table while `len` exceeds the threshold.
    pub fn try_put(&mut self, key: i64, value: V) -> Result<Option<V>, CapacityError> {
        match self.lookup(key) {
            Lookup::Found(handle) => Ok(Some(core::mem::replace(&mut self.values[handle], value))),
            Lookup::Vacant(idx) => {
                let handle = self.values.insert(value);
                self.slots.occupy(idx, key, handle);
                self.mod_count.bump();
                self.grow_past_threshold();
                Ok(None)
            }
            Lookup::Exhausted => Err(CapacityError::TableFull {
                capacity: self.capacity(),
            }),
        }
    }

    fn grow_past_threshold(&mut self) {
        while self.len() > self.threshold {
            if !self.resize() {
                self.saturated_inserts += 1;
                return;
            }
        }
    }

    /// Doubles the slot array and re-places every entry under the same seeds.
    ///
    /// Returns `false` without touching the table when it is already at its
    /// capacity ceiling.
    pub fn resize(&mut self) -> bool {
        if self.capacity() >= self.max_capacity {
            return false;
        }
        self.geometry = self.geometry.doubled();
        let old = core::mem::replace(&mut self.slots, SlotTable::new(self.geometry.capacity()));
        for (key, handle) in old.into_occupied() {
            self.place_unique(key, handle);
        }
        self.threshold = config::threshold(self.geometry.capacity(), self.load_factor);
        self.resizes += 1;
        self.mod_count.bump();
        true
    }

    /// Places a key known to be absent into the first empty slot of its probe.
    fn place_unique(&mut self, key: i64, handle: DefaultKey) {
        let slots = &self.slots;
        let idx = self
            .probe(key)
            .find(|&idx| slots.get(idx) == Slot::Empty);
        match idx {
            Some(idx) => self.slots.occupy(idx, key, handle),
            None => unreachable!("grown table has fewer entries than slots"),
        }
    }

    /// Keys in unspecified order.
    pub fn keys(&self) -> Vec<i64> {
        self.key_iter().collect()
    }

    pub fn key_iter(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Lazy walk over the current values; call again to restart.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.slots.iter(), &self.values)
    }

    /// Calls `visitor` for every entry, then verifies the table was not
    /// structurally modified in the meantime.
    pub fn for_each<F>(&self, mut visitor: F) -> Result<(), ConcurrentModificationError>
    where
        F: FnMut(i64, &V),
    {
        let snapshot = self.mod_count.snapshot();
        for (key, value) in self.iter() {
            visitor(key, value);
        }
        snapshot.check(self.mod_count)
    }

    pub(crate) fn mod_count(&self) -> ModCount {
        self.mod_count
    }

    /// Entry stored at slot `idx`, if any. Out-of-range indices yield `None`.
    pub(crate) fn entry_at(&self, idx: usize) -> Option<(i64, &V)> {
        if idx >= self.slots.capacity() {
            return None;
        }
        let (key, handle) = self.slots.get(idx).occupied()?;
        self.values.get(handle).map(|v| (key, v))
    }

    /// Slot currently holding `key`.
    #[cfg(test)]
    pub(crate) fn slot_of(&self, key: i64) -> Option<usize> {
        self.probe(key).find(|&idx| match self.slots.get(idx) {
            Slot::Occupied { key: k, .. } => k == key,
            Slot::Empty => false,
        })
    }

    #[cfg(test)]
    pub(crate) fn seeds(&self) -> (HashFamily, HashFamily) {
        (self.first, self.second)
    }

    /// Number of slots inspected to find `key`.
    #[cfg(test)]
    pub(crate) fn probe_length(&self, key: i64) -> Option<usize> {
        self.probe(key)
            .position(|idx| matches!(self.slots.get(idx), Slot::Occupied { key: k, .. } if k == key))
            .map(|pos| pos + 1)
    }
}

impl<V> Default for LongHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for LongHashMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a LongHashMap<V> {
    type Item = (i64, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V> Extend<(i64, V)> for LongHashMap<V> {
    fn extend<T: IntoIterator<Item = (i64, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<V> FromIterator<(i64, V)> for LongHashMap<V> {
    fn from_iter<T: IntoIterator<Item = (i64, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    /// Invariant: inserted keys read back; never-inserted keys are absent.
    #[test]
    fn put_get_and_absence() {
        let mut t = LongHashMap::new();
        assert_eq!(t.put(1, "a"), None);
        assert_eq!(t.put(2, "b"), None);
        assert_eq!(t.get(1), Some(&"a"));
        assert_eq!(t.get(2), Some(&"b"));
        assert_eq!(t.get(3), None);
        assert!(!t.contains_key(3));
        assert!(t.contains_key(1));
    }

    /// Invariant: replacing returns the old value, keeps `len`, and does not
    /// count as a structural modification.
    #[test]
    fn replace_is_in_place() {
        let mut t = LongHashMap::new();
        t.put(5, "x");
        let before = t.modification_count();
        assert_eq!(t.put(5, "y"), Some("x"));
        assert_eq!(t.get(5), Some(&"y"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.modification_count(), before);
    }

    /// Invariant: crossing the threshold once doubles the capacity exactly once.
    #[test]
    fn thirteenth_key_resizes_once() {
        let mut t = LongHashMap::new();
        assert_eq!((t.capacity(), t.threshold()), (16, 12));
        for k in 0..12 {
            t.put(k * 1_000_003, k);
        }
        assert_eq!(t.capacity(), 16);
        t.put(12 * 1_000_003, 12);
        assert_eq!(t.capacity(), 32);
        assert_eq!(t.stats().resizes, 1);
        for k in 0..13 {
            assert_eq!(t.get(k * 1_000_003), Some(&k));
        }
    }

    /// Invariant: seeds survive resizes; only geometry changes.
    #[test]
    fn resize_keeps_seeds() {
        let mut t = LongHashMap::with_capacity(1);
        let seeds = t.seeds();
        for k in 0..500 {
            t.put(k, ());
        }
        assert!(t.stats().resizes > 0);
        assert_eq!(t.seeds(), seeds);
    }

    /// Invariant: tables built from the same injected generator state place
    /// keys identically.
    #[test]
    fn injected_rng_is_reproducible() {
        let build = || {
            let mut rng = StdRng::seed_from_u64(99);
            let mut t = LongHashMap::with_config_and_rng(TableConfig::default(), &mut rng).unwrap();
            for k in 0..40 {
                t.put(k, k);
            }
            t
        };
        let (a, b) = (build(), build());
        for k in 0..40 {
            assert_eq!(a.slot_of(k), b.slot_of(k));
        }
    }

    /// Invariant: independently seeded tables fed the same keys disagree on
    /// placement. Twenty trials of sixteen keys make an accidental match of
    /// every trial astronomically unlikely.
    #[test]
    fn independent_tables_place_keys_differently() {
        let keys: Vec<i64> = (0..16).map(|k| k * 7919).collect();
        let differing = (0..20)
            .filter(|_| {
                let mut a = LongHashMap::with_capacity(64);
                let mut b = LongHashMap::with_capacity(64);
                for &k in &keys {
                    a.put(k, ());
                    b.put(k, ());
                }
                keys.iter().any(|&k| a.slot_of(k) != b.slot_of(k))
            })
            .count();
        assert!(differing > 0);
    }

    /// Invariant: a saturated table keeps accepting keys until every slot is
    /// taken, counts each over-threshold insert, then reports `TableFull`.
    #[test]
    fn ceiling_saturation_is_observable() {
        let config = TableConfig::new().initial_capacity(2).max_capacity(8);
        let mut t = LongHashMap::with_config(config).unwrap();
        for k in 0..6 {
            t.put(k, k);
        }
        assert_eq!(t.capacity(), 8);
        assert_eq!(t.threshold(), 6);
        assert!(!t.is_saturated());
        assert_eq!(t.stats().saturated_inserts, 0);

        t.put(6, 6);
        t.put(7, 7);
        assert!(t.is_saturated());
        assert_eq!(t.stats().saturated_inserts, 2);
        assert_eq!(t.capacity(), 8);

        assert_eq!(
            t.try_put(8, 8),
            Err(CapacityError::TableFull { capacity: 8 })
        );
        // Replacing still works on a full table.
        assert_eq!(t.try_put(3, 30), Ok(Some(3)));
        for k in 0..8 {
            assert!(t.contains_key(k));
        }
        assert!(!t.contains_key(8));
    }

    #[test]
    #[should_panic(expected = "table is full")]
    fn put_on_full_table_panics() {
        let config = TableConfig::new().initial_capacity(1).max_capacity(1);
        let mut t = LongHashMap::with_config(config).unwrap();
        t.put(1, ());
        t.put(2, ());
    }

    /// Invariant: `resize` refuses to grow past the ceiling.
    #[test]
    fn resize_stops_at_ceiling() {
        let config = TableConfig::new().initial_capacity(4).max_capacity(4);
        let mut t: LongHashMap<()> = LongHashMap::with_config(config).unwrap();
        assert!(!t.resize());
        assert_eq!(t.capacity(), 4);
    }

    /// Invariant: an explicit resize keeps every entry and bumps the counter.
    #[test]
    fn explicit_resize_preserves_entries() {
        let mut t = LongHashMap::new();
        for k in -5..5 {
            t.put(k, k * 2);
        }
        let before = t.modification_count();
        assert!(t.resize());
        assert_eq!(t.capacity(), 32);
        assert_eq!(t.modification_count(), before + 1);
        for k in -5..5 {
            assert_eq!(t.get(k), Some(&(k * 2)));
        }
    }

    /// Invariant: every enumeration yields each entry exactly once.
    #[test]
    fn enumerations_agree() {
        let t: LongHashMap<i64> = (0..100).map(|k| (k * 31 - 1000, k)).collect();
        let keys: BTreeSet<i64> = t.keys().into_iter().collect();
        let expected: BTreeSet<i64> = (0..100).map(|k| k * 31 - 1000).collect();
        assert_eq!(keys, expected);
        assert_eq!(t.key_iter().len(), 100);

        let values: BTreeSet<i64> = t.values().copied().collect();
        assert_eq!(values, (0..100).collect::<BTreeSet<i64>>());

        let mut visited = BTreeSet::new();
        t.for_each(|k, v| {
            assert_eq!(k, v * 31 - 1000);
            visited.insert(k);
        })
        .unwrap();
        assert_eq!(visited, expected);

        let pairs: BTreeSet<(i64, i64)> = (&t).into_iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(pairs.len(), 100);
    }

    /// Invariant: `values()` is restartable; a second call walks everything again.
    #[test]
    fn values_restart() {
        let mut t = LongHashMap::new();
        t.extend([(1, 10), (2, 20), (3, 30)]);
        let first: i32 = t.values().sum();
        let second: i32 = t.values().sum();
        assert_eq!(first, 60);
        assert_eq!(second, 60);
    }

    #[test]
    fn get_mut_updates_value() {
        let mut t = LongHashMap::new();
        t.put(i64::MIN, String::from("lo"));
        t.get_mut(i64::MIN).unwrap().push('w');
        assert_eq!(t.get(i64::MIN).map(String::as_str), Some("low"));
        assert!(t.get_mut(0).is_none());
    }

    #[test]
    fn debug_lists_entries() {
        let mut t = LongHashMap::new();
        t.put(7, "seven");
        assert_eq!(format!("{t:?}"), r#"{7: "seven"}"#);
    }

    /// Invariant: `entry_at` resolves occupied slots and tolerates any index.
    #[test]
    fn entry_at_matches_slot_of() {
        let mut t = LongHashMap::new();
        t.put(42, 'x');
        let idx = t.slot_of(42).unwrap();
        assert_eq!(t.entry_at(idx), Some((42, &'x')));
        assert_eq!(t.entry_at(t.capacity()), None);
    }

    /// Multiplicative inverse of an odd `a` modulo 2^64 (Newton iteration).
    fn inverse_odd(a: u64) -> u64 {
        let mut x = a;
        for _ in 0..5 {
            x = x.wrapping_mul(2u64.wrapping_sub(a.wrapping_mul(x)));
        }
        x
    }

    /// Invariant: keys crafted so that `c * k_i = i` for a fixed odd `c`
    /// collide under any hash that multiplies by `c`; with per-table random
    /// multipliers they still spread and probe chains stay short.
    #[test]
    fn crafted_keys_keep_probe_chains_short() {
        let c = 0x9E37_79B9_7F4A_7C15u64;
        let inv = inverse_odd(c);
        assert_eq!(c.wrapping_mul(inv), 1);

        let keys: Vec<i64> = (0..4096u64).map(|i| i.wrapping_mul(inv) as i64).collect();
        let mut t = LongHashMap::new();
        for &k in &keys {
            t.put(k, ());
        }
        assert_eq!(t.len(), keys.len());
        let total: usize = keys.iter().map(|&k| t.probe_length(k).unwrap()).sum();
        let mean = total as f64 / keys.len() as f64;
        assert!(mean < 8.0, "mean probe length {mean}");
    }
}
