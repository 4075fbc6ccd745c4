//! Modification counter and fail-fast iteration snapshots.
//!
//! Every structural mutation bumps the counter. An iteration takes a
//! `Snapshot` up front and checks it after visiting entries; a moved counter
//! means the walk can no longer be trusted and is abandoned with
//! `ConcurrentModificationError`. Detection is after the fact, not
//! prevention.

use crate::error::ConcurrentModificationError;

/// Monotonic count of structural mutations (inserts of new keys, resizes).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModCount(u64);

impl ModCount {
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Captures the current count for a later `Snapshot::check`.
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { expected: self.0 }
    }
}

/// Count observed when an iteration started.
#[derive(Debug, Clone, Copy)]
#[must_use = "a snapshot does nothing unless checked"]
pub struct Snapshot {
    expected: u64,
}

impl Snapshot {
    #[inline]
    pub fn check(&self, now: ModCount) -> Result<(), ConcurrentModificationError> {
        if now.0 == self.expected {
            Ok(())
        } else {
            Err(ConcurrentModificationError {
                expected: self.expected,
                observed: now.0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_count_passes() {
        let mut c = ModCount::new();
        c.bump();
        let s = c.snapshot();
        assert!(s.check(c).is_ok());
    }

    /// Invariant: any mutation between snapshot and check is reported with both counts.
    #[test]
    fn bumped_count_fails() {
        let mut c = ModCount::new();
        let s = c.snapshot();
        c.bump();
        c.bump();
        assert_eq!(
            s.check(c),
            Err(ConcurrentModificationError {
                expected: 0,
                observed: 2
            })
        );
    }
}
