//! Double-hashing probe sequence over a power-of-two table.
//!
//! `idx(i) = (h1 + i * h2) mod capacity` with `h2` forced odd. An odd stride
//! is coprime with any power of two, so the first `capacity` indices are a
//! permutation of `0..capacity`: inserts always find an empty slot while one
//! exists, and no probe loops forever.

use crate::hash_family::HashFamily;

/// Capacity-derived parameters shared by hashing and probing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    capacity: usize,
    shift: u32,
}

impl Geometry {
    /// Geometry for the smallest power of two holding `requested` slots (at least 1).
    pub fn for_capacity(requested: usize) -> Self {
        let capacity = requested.max(1).next_power_of_two();
        Self {
            capacity,
            shift: u64::BITS - capacity.trailing_zeros(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Right shift selecting `log2(capacity)` high bits of a 64-bit hash.
    pub fn shift(&self) -> u32 {
        self.shift
    }

    pub fn mask(&self) -> usize {
        self.capacity - 1
    }

    /// Geometry with twice the slots.
    pub fn doubled(&self) -> Self {
        Self::for_capacity(self.capacity << 1)
    }
}

/// Iterator over the slot indices a lookup or insert visits for one key.
///
/// Yields exactly `capacity` indices. The stride is only hashed once the
/// first slot turned out to be taken.
#[derive(Clone, Debug)]
pub struct ProbeSequence {
    key: i64,
    second: HashFamily,
    geometry: Geometry,
    start: usize,
    stride: Option<usize>,
    step: usize,
}

impl ProbeSequence {
    pub fn new(key: i64, first: &HashFamily, second: &HashFamily, geometry: Geometry) -> Self {
        Self {
            key,
            second: *second,
            geometry,
            start: first.index(key, geometry.shift()),
            stride: None,
            step: 0,
        }
    }

    fn stride(&mut self) -> usize {
        let (key, second, shift) = (self.key, self.second, self.geometry.shift());
        *self
            .stride
            .get_or_insert_with(|| second.index(key, shift) | 1)
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.step >= self.geometry.capacity() {
            return None;
        }
        let idx = if self.step == 0 {
            self.start
        } else {
            let stride = self.stride();
            self.start.wrapping_add(self.step.wrapping_mul(stride)) & self.geometry.mask()
        };
        self.step += 1;
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.geometry.capacity() - self.step;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ProbeSequence {}
