// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hash composition: deriving the `k` bit positions of an element.
//!
//! A Bloom filter never looks at its elements directly. It asks a [`HashComposer`] for `k`
//! indices in `[0, m)` and sets or tests those bits. Two ways of building a composer ship with
//! this crate:
//!
//! - [`IndependentHashes`]: an ordered list of `k` [`HashStrategy`] values, each mapping the
//!   element to one index on its own. [`MurmurHashStrategy`] (independent seeded hashing) and
//!   [`XxHashStrategy`] (general-purpose bit-mixing) are built in, and any digest function can
//!   be plugged in through [`FnHash`].
//! - [`DoubleHashing`]: two hash computations combined arithmetically into `k` indices.
//!
//! Composers must be deterministic: the same element always yields the same indices, otherwise
//! `contains` could never succeed after `insert`.

mod composer;
mod murmurhash;
mod xxhash;

pub use self::composer::DoubleHashing;
pub use self::composer::FnHash;
pub use self::composer::IndependentHashes;
pub use self::murmurhash::MurmurHash3X64128;
pub use self::murmurhash::MurmurHashStrategy;
pub use self::xxhash::XxHashStrategy;

/// The seed 9001 is the default base seed of every built-in hash family.
///
/// Filters only agree on what their bits mean when they hash with the same seeds. Two filters
/// built with different seeds may still be combined (their sizes match), but the result is
/// meaningless for either element set.
pub const DEFAULT_SEED: u64 = 9001;

/// Maps an element to a single bit index.
///
/// Implementations must return a value in `[0, num_bits)` and must be deterministic.
///
/// # Examples
///
/// ```
/// # use bloomfilter::hash::HashStrategy;
/// # use bloomfilter::hash::MurmurHashStrategy;
/// let strategy = MurmurHashStrategy::with_seed(7);
/// let index = strategy.hash_index(&42u64, 100);
/// assert!(index < 100);
/// assert_eq!(index, strategy.hash_index(&42u64, 100));
/// ```
pub trait HashStrategy<T: ?Sized> {
    /// Returns the bit index of `item` in a filter of `num_bits` bits.
    fn hash_index(&self, item: &T, num_bits: u64) -> u64;
}

impl<T: ?Sized, S: HashStrategy<T> + ?Sized> HashStrategy<T> for Box<S> {
    fn hash_index(&self, item: &T, num_bits: u64) -> u64 {
        (**self).hash_index(item, num_bits)
    }
}

/// A strategy that can be instantiated from a seed alone.
pub trait SeededStrategy: Sized {
    /// Creates the strategy for `seed`.
    fn from_seed(seed: u64) -> Self;
}

impl SeededStrategy for MurmurHashStrategy {
    fn from_seed(seed: u64) -> Self {
        MurmurHashStrategy::with_seed(seed)
    }
}

impl SeededStrategy for XxHashStrategy {
    fn from_seed(seed: u64) -> Self {
        XxHashStrategy::with_seed(seed)
    }
}

/// Derives all `k` bit indices of an element.
pub trait HashComposer<T: ?Sized> {
    /// Returns `k`, the number of indices produced per element.
    fn num_hashes(&self) -> u16;

    /// Yields exactly [`num_hashes()`](Self::num_hashes) indices, each in `[0, num_bits)`.
    ///
    /// `num_bits` is never zero.
    fn bit_indices(&self, item: &T, num_bits: u64) -> impl Iterator<Item = u64>;
}

/// Yields the prime numbers in increasing order.
pub(crate) fn primes() -> impl Iterator<Item = u64> {
    (2u64..).filter(|&n| (2u64..).take_while(|&d| d * d <= n).all(|d| n % d != 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primes() {
        let first: Vec<u64> = primes().take(8).collect();
        assert_eq!(first, vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert_eq!(primes().nth(99), Some(541));
    }

    #[test]
    fn test_boxed_strategy_delegates() {
        let plain = XxHashStrategy::with_seed(5);
        let boxed: Box<dyn HashStrategy<str>> = Box::new(plain);
        assert_eq!(boxed.hash_index("pear", 977), plain.hash_index("pear", 977));
    }
}
