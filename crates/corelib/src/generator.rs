//! Activation sources.
//!
//! An activation source decides which identifiers of a ring are active. The
//! ring only needs the resulting set; how it is produced is up to the source.

use std::collections::BTreeSet;

/// Produces the active identifiers for a ring of a given size.
///
/// Returned ids are bounds-checked by [`Ring::activate`](crate::Ring::activate).
pub trait ActivationSource: Send + Sync {
    fn active_ids(&self, size: u64) -> BTreeSet<u64>;
}

impl ActivationSource for BTreeSet<u64> {
    fn active_ids(&self, _size: u64) -> BTreeSet<u64> {
        self.clone()
    }
}

impl ActivationSource for Vec<u64> {
    fn active_ids(&self, _size: u64) -> BTreeSet<u64> {
        self.iter().copied().collect()
    }
}

/// Linear-congruential generator over the ring.
///
/// The first id is `(multiplier * seed + increment) mod size`; each next id
/// applies the same recurrence to the previous one. Generation stops at the
/// first repeated id, so at most `size` ids are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lcg {
    pub seed: u64,
    pub increment: u64,
    pub multiplier: u64,
}

impl Lcg {
    pub fn new(seed: u64, increment: u64, multiplier: u64) -> Self {
        Self {
            seed,
            increment,
            multiplier,
        }
    }

    #[inline]
    fn next(&self, x: u64, size: u64) -> u64 {
        // Widened so `multiplier * x + increment` cannot overflow.
        let next = (u128::from(self.multiplier) * u128::from(x) + u128::from(self.increment))
            % u128::from(size);
        next as u64
    }
}

impl ActivationSource for Lcg {
    fn active_ids(&self, size: u64) -> BTreeSet<u64> {
        let mut ids = BTreeSet::new();
        if size == 0 {
            return ids;
        }

        let mut x = self.next(self.seed, size);
        while ids.insert(x) {
            x = self.next(x, size);
        }
        ids
    }
}
