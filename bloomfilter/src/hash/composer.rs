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

use std::hash::Hash;

use super::HashComposer;
use super::HashStrategy;
use super::SeededStrategy;
use super::primes;
use super::xxhash::xxhash64;

/// `k` independent hash strategies, applied in order.
///
/// Every index is reduced modulo the filter size, so a strategy that overshoots
/// `[0, num_bits)` still lands on a valid bit.
///
/// # Examples
///
/// ```
/// # use bloomfilter::hash::HashComposer;
/// # use bloomfilter::hash::IndependentHashes;
/// # use bloomfilter::hash::MurmurHashStrategy;
/// // Seeds 2, 3, 5, 7, 11, 13, 17, 19.
/// let hashes = IndependentHashes::<MurmurHashStrategy>::with_primes(8, 0);
/// assert_eq!(HashComposer::<u64>::num_hashes(&hashes), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndependentHashes<S> {
    strategies: Vec<S>,
}

impl<S> IndependentHashes<S> {
    /// Wraps an explicit, ordered list of strategies.
    ///
    /// The list is validated when it is handed to a filter: an empty list is rejected there.
    pub fn new(strategies: Vec<S>) -> Self {
        IndependentHashes { strategies }
    }

    /// Returns the strategies in application order.
    pub fn strategies(&self) -> &[S] {
        &self.strategies
    }
}

impl<S: SeededStrategy> IndependentHashes<S> {
    /// Builds `num_hashes` strategies seeded with `base_seed` plus the first `num_hashes` primes.
    pub fn with_primes(num_hashes: u16, base_seed: u64) -> Self {
        let strategies = primes()
            .take(num_hashes as usize)
            .map(|p| S::from_seed(base_seed.wrapping_add(p)))
            .collect();
        IndependentHashes { strategies }
    }
}

impl<S> FromIterator<S> for IndependentHashes<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        IndependentHashes::new(iter.into_iter().collect())
    }
}

impl<T: ?Sized, S: HashStrategy<T>> HashComposer<T> for IndependentHashes<S> {
    fn num_hashes(&self) -> u16 {
        u16::try_from(self.strategies.len()).unwrap_or(u16::MAX)
    }

    fn bit_indices(&self, item: &T, num_bits: u64) -> impl Iterator<Item = u64> {
        self.strategies
            .iter()
            .map(move |strategy| strategy.hash_index(item, num_bits) % num_bits)
    }
}

/// Double hashing (Kirsch-Mitzenmacher) over two XxHash64 computations.
///
/// Only two digests are computed per element regardless of `k`:
///
/// ```text
/// h0 = XXHash64(item, seed)
/// h1 = XXHash64(item, h0)
/// index_i = ((h0 + i * h1) >> 1) % num_bits,  for i in 1..=k
/// ```
///
/// The right shift by 1 improves bit distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoubleHashing {
    num_hashes: u16,
    seed: u64,
}

impl DoubleHashing {
    /// Creates a composer producing `num_hashes` indices per element.
    pub fn new(num_hashes: u16, seed: u64) -> Self {
        DoubleHashing { num_hashes, seed }
    }

    /// Returns the seed of the first hash computation.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<T: Hash + ?Sized> HashComposer<T> for DoubleHashing {
    fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    fn bit_indices(&self, item: &T, num_bits: u64) -> impl Iterator<Item = u64> {
        let h0 = xxhash64(item, self.seed);
        let h1 = xxhash64(item, h0);
        (1..=self.num_hashes).map(move |i| {
            let hash = h0.wrapping_add(u64::from(i).wrapping_mul(h1));
            (hash >> 1) % num_bits
        })
    }
}

/// Adapts a caller-supplied digest function into a [`HashStrategy`].
///
/// The digest is reduced modulo the filter size.
///
/// # Examples
///
/// ```
/// # use bloomfilter::hash::FnHash;
/// # use bloomfilter::hash::HashStrategy;
/// let identity = FnHash(|x: &u64| *x);
/// assert_eq!(identity.hash_index(&70, 64), 6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnHash<F>(pub F);

impl<T: ?Sized, F: Fn(&T) -> u64> HashStrategy<T> for FnHash<F> {
    fn hash_index(&self, item: &T, num_bits: u64) -> u64 {
        (self.0)(item) % num_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::MurmurHashStrategy;
    use crate::hash::XxHashStrategy;

    #[test]
    fn test_with_primes_seeds() {
        let hashes = IndependentHashes::<MurmurHashStrategy>::with_primes(4, 100);
        let seeds: Vec<u64> = hashes.strategies().iter().map(|s| s.seed()).collect();
        assert_eq!(seeds, vec![102, 103, 105, 107]);
    }

    #[test]
    fn test_independent_hashes_yield_k_indices() {
        let hashes = IndependentHashes::<XxHashStrategy>::with_primes(6, 0);
        let indices: Vec<u64> = hashes.bit_indices("plum", 33).collect();
        assert_eq!(indices.len(), 6);
        assert!(indices.iter().all(|&i| i < 33));
    }

    #[test]
    fn test_independent_hashes_keep_order() {
        let hashes: IndependentHashes<FnHash<fn(&u64) -> u64>> = [
            FnHash((|x: &u64| *x) as fn(&u64) -> u64),
            FnHash((|x: &u64| *x + 1) as fn(&u64) -> u64),
            FnHash((|x: &u64| *x * 3) as fn(&u64) -> u64),
        ]
        .into_iter()
        .collect();
        let indices: Vec<u64> = hashes.bit_indices(&5u64, 10).collect();
        assert_eq!(indices, vec![5, 6, 5]);
    }

    struct Unreduced;

    impl HashStrategy<u64> for Unreduced {
        fn hash_index(&self, item: &u64, num_bits: u64) -> u64 {
            *item + num_bits
        }
    }

    #[test]
    fn test_out_of_range_strategy_is_reduced() {
        let hashes = IndependentHashes::new(vec![Unreduced]);
        let indices: Vec<u64> = hashes.bit_indices(&5u64, 70).collect();
        assert_eq!(indices, vec![5]);
    }

    #[test]
    fn test_empty_list_reports_zero_hashes() {
        let hashes = IndependentHashes::<MurmurHashStrategy>::new(vec![]);
        assert_eq!(HashComposer::<u64>::num_hashes(&hashes), 0);
    }

    #[test]
    fn test_double_hashing() {
        let composer = DoubleHashing::new(7, 9001);
        let first: Vec<u64> = composer.bit_indices(&"apple", 1000).collect();
        let second: Vec<u64> = composer.bit_indices(&"apple", 1000).collect();
        assert_eq!(first.len(), 7);
        assert_eq!(first, second);
        assert!(first.iter().all(|&i| i < 1000));
    }
}
