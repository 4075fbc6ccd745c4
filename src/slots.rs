//! Slot table: the power-of-two array probed by the map.
//!
//! An occupied slot carries the key and a generational handle into the
//! map's value arena, so a slot is `Copy` and growing the table moves only
//! `(key, handle)` pairs.

use slotmap::DefaultKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum Slot {
    #[default]
    Empty,
    Occupied {
        key: i64,
        handle: DefaultKey,
    },
}

impl Slot {
    pub(crate) fn occupied(&self) -> Option<(i64, DefaultKey)> {
        match *self {
            Slot::Empty => None,
            Slot::Occupied { key, handle } => Some((key, handle)),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SlotTable {
    slots: Box<[Slot]>,
}

impl SlotTable {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::Empty; capacity].into_boxed_slice(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn get(&self, idx: usize) -> Slot {
        self.slots[idx]
    }

    /// Fills an empty slot. Occupied slots are never overwritten: keys are
    /// immutable and entries are never removed.
    #[inline]
    pub(crate) fn occupy(&mut self, idx: usize, key: i64, handle: DefaultKey) {
        debug_assert!(matches!(self.slots[idx], Slot::Empty));
        self.slots[idx] = Slot::Occupied { key, handle };
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    /// Consumes the table yielding its live `(key, handle)` pairs.
    pub(crate) fn into_occupied(self) -> impl Iterator<Item = (i64, DefaultKey)> {
        self.slots.into_vec().into_iter().filter_map(|s| s.occupied())
    }
}
