//! Hash family: randomized multiply-shift hashing of `i64` keys.
//!
//! A member of the family is `(mul * k + add) >> shift` with `mul` a random
//! odd 64-bit multiplier and `add` a random 64-bit addend. Both are drawn
//! per table from an unpredictable source, so neither the home slot nor the
//! stride of a key is known to whoever picks the keys, and two tables fed
//! the same keys place them differently.

use rand::RngCore;

/// One member of the multiply-shift family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashFamily {
    mul: u64,
    add: u64,
}

impl HashFamily {
    /// Draws a fresh member from `rng`: two independent 64-bit draws.
    pub fn from_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mul = new_seed(rng);
        let add = new_seed(rng);
        Self::with_params(mul, add)
    }

    /// Fixes the parameters; used to reproduce a placement in tests and
    /// benches. The low bit of `mul` is forced so the multiplier is odd.
    pub const fn with_params(mul: u64, add: u64) -> Self {
        Self { mul: mul | 1, add }
    }

    pub const fn multiplier(&self) -> u64 {
        self.mul
    }

    pub const fn addend(&self) -> u64 {
        self.add
    }

    /// Maps `key` to the `64 - shift` high bits of `mul * key + add`.
    ///
    /// `shift` is `64 - log2(capacity)`; a shift of 64 (capacity 1) yields 0.
    #[inline]
    pub fn index(&self, key: i64, shift: u32) -> usize {
        let mixed = self.mul.wrapping_mul(key as u64).wrapping_add(self.add);
        mixed.checked_shr(shift).unwrap_or(0) as usize
    }
}

/// Draws one 64-bit seed.
pub fn new_seed<R: RngCore + ?Sized>(rng: &mut R) -> u64 {
    rng.next_u64()
}
