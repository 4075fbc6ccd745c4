//! Borrowing iterators over a `LongHashMap`.
//!
//! All of them walk the slot table in slot order, which depends on the
//! table's seeds and capacity and is therefore unspecified. They borrow the
//! map, so a walk cannot overlap a mutation of the same map. A clone forks
//! the walk at its current position; calling `values()` again starts over.

use crate::slots::Slot;
use core::iter::FusedIterator;
use slotmap::{DefaultKey, SlotMap};

/// Iterator over `(key, &value)` pairs.
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot>,
    values: &'a SlotMap<DefaultKey, V>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(
        slots: core::slice::Iter<'a, Slot>,
        values: &'a SlotMap<DefaultKey, V>,
    ) -> Self {
        Self {
            slots,
            values,
            remaining: values.len(),
        }
    }
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            values: self.values,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some((key, handle)) = slot.occupied() {
                if let Some(value) = self.values.get(handle) {
                    self.remaining -= 1;
                    return Some((key, value));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Iterator over keys.
pub struct Keys<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<V> Clone for Keys<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> Iterator for Keys<'_, V> {
    type Item = i64;
    #[inline]
    fn next(&mut self) -> Option<i64> {
        self.inner.next().map(|(k, _)| k)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}
impl<V> FusedIterator for Keys<'_, V> {}

/// Lazy iterator over values.
pub struct Values<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<V> Clone for Values<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}
impl<V> FusedIterator for Values<'_, V> {}
