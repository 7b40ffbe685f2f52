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

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use super::builder::DEFAULT_NUM_HASHES;
use super::builder::MAX_NUM_BITS;
use super::builder::MAX_NUM_HASHES;
use super::builder::MIN_NUM_BITS;
use super::builder::MIN_NUM_HASHES;
use super::builder::check_num_bits;
use super::builder::check_num_hashes;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;
use crate::hash::HashComposer;
use crate::hash::IndependentHashes;
use crate::hash::MurmurHashStrategy;

/// A fixed-size Bloom filter over elements of type `T`.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true` until [`clear()`](Self::clear))
/// - Tunable false positive rate
/// - Constant space usage: `size()` bits, fixed at construction
///
/// The `k` bit positions of an element come from the hash composer `H`, see
/// [`crate::hash`]. By default `k = 3` independently seeded MurmurHash3 functions are used.
///
/// Filters are single-threaded values: mutation needs `&mut self`, so sharing one across
/// threads requires external synchronization such as a `Mutex`.
pub struct BloomFilter<T: ?Sized, H = IndependentHashes<MurmurHashStrategy>> {
    /// Derives the k bit indices of an element
    hasher: H,
    /// Total number of bits in the filter (m)
    num_bits: u64,
    /// Count of bits set to 1
    num_bits_set: u64,
    /// Bit array packed into u64 words
    /// Length = ceil(num_bits / 64); bits at or above num_bits stay zero
    bit_array: Box<[u64]>,
    _item: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized> BloomFilter<T> {
    /// Creates an empty filter of `num_bits` bits hashing with [`DEFAULT_NUM_HASHES`]
    /// independent MurmurHash3 functions.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0 or greater than [`MAX_NUM_BITS`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let filter = BloomFilter::<u64>::new(256);
    /// assert_eq!(filter.size(), 256);
    /// assert_eq!(filter.num_hashes(), 3);
    /// ```
    pub fn new(num_bits: u64) -> Self {
        Self::with_num_hashes(num_bits, DEFAULT_NUM_HASHES)
    }

    /// Creates an empty filter of `num_bits` bits hashing with `num_hashes` independent
    /// MurmurHash3 functions.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` or `num_hashes` is 0 or above its maximum.
    pub fn with_num_hashes(num_bits: u64, num_hashes: u16) -> Self {
        check_num_bits(num_bits);
        check_num_hashes(num_hashes);
        let hasher = IndependentHashes::with_primes(num_hashes, DEFAULT_SEED);
        Self::from_parts(num_bits, hasher)
    }
}

impl<T: ?Sized, H> BloomFilter<T, H> {
    pub(super) fn from_parts(num_bits: u64, hasher: H) -> Self {
        let num_words = num_bits.div_ceil(64) as usize;
        BloomFilter {
            hasher,
            num_bits,
            num_bits_set: 0,
            bit_array: vec![0u64; num_words].into_boxed_slice(),
            _item: PhantomData,
        }
    }

    /// Resets the filter to its initial empty state.
    ///
    /// Clears all bits while preserving size and hash configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::<str>::new(1024);
    /// filter.insert("apple");
    /// assert!(!filter.is_empty());
    ///
    /// filter.clear();
    /// assert!(filter.is_empty());
    /// assert!(!filter.contains("apple"));
    /// ```
    pub fn clear(&mut self) {
        self.bit_array.fill(0);
        self.num_bits_set = 0;
    }

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// Afterwards this filter recognizes every item either filter recognized. Only the sizes
    /// are checked; `self` keeps its own hash configuration.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`CapacityMismatch`](crate::error::ErrorKind::CapacityMismatch)
    /// if the sizes differ. Neither filter is modified in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::<str>::new(1024);
    /// let mut f2 = BloomFilter::<str>::new(1024);
    ///
    /// f1.insert("a");
    /// f2.insert("b");
    ///
    /// f1.union_assign(&f2).unwrap();
    /// assert!(f1.contains("a"));
    /// assert!(f1.contains("b"));
    /// ```
    pub fn union_assign(&mut self, other: &Self) -> Result<(), Error> {
        self.check_compatible("union", other)?;

        let mut num_bits_set = 0;
        for (word, other_word) in self.bit_array.iter_mut().zip(other.bit_array.iter()) {
            *word |= *other_word;
            num_bits_set += u64::from(word.count_ones());
        }
        self.num_bits_set = num_bits_set;
        Ok(())
    }

    /// Intersects this filter with another via bitwise AND.
    ///
    /// Afterwards this filter recognizes the items both filters recognized, plus false
    /// positives. The result is only an approximation of the true intersection: bits shared
    /// by unrelated elements of the two filters survive, so an element present in neither
    /// set may still match, and the false positive rate is not that of a filter built from
    /// the intersection directly.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`CapacityMismatch`](crate::error::ErrorKind::CapacityMismatch)
    /// if the sizes differ. Neither filter is modified in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::<str>::new(1024);
    /// let mut f2 = BloomFilter::<str>::new(1024);
    ///
    /// f1.insert("a");
    /// f1.insert("b");
    /// f2.insert("b");
    /// f2.insert("c");
    ///
    /// f1.intersection_assign(&f2).unwrap();
    /// assert!(f1.contains("b")); // In both
    /// // "a" and "c" likely return false now
    /// ```
    pub fn intersection_assign(&mut self, other: &Self) -> Result<(), Error> {
        self.check_compatible("intersect", other)?;

        let mut num_bits_set = 0;
        for (word, other_word) in self.bit_array.iter_mut().zip(other.bit_array.iter()) {
            *word &= *other_word;
            num_bits_set += u64::from(word.count_ones());
        }
        self.num_bits_set = num_bits_set;
        Ok(())
    }

    /// Returns whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the total number of bits in the filter, as given at construction.
    pub fn size(&self) -> u64 {
        self.num_bits
    }

    /// Returns the hash composer deriving this filter's bit indices.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values near 0.5 indicate the filter is approaching saturation.
    /// Values above 0.5 indicate degraded false positive rates.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.num_bits as f64
    }

    /// Checks if two filters can be combined with union or intersection.
    ///
    /// Filters are compatible if they have the same size.
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.num_bits == other.num_bits
    }

    fn check_compatible(&self, op: &'static str, other: &Self) -> Result<(), Error> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(Error::capacity_mismatch(op, self.num_bits, other.num_bits))
        }
    }
}

impl<T: ?Sized, H: Clone> BloomFilter<T, H> {
    /// Returns a new filter holding the bitwise OR of `self` and `other`.
    ///
    /// The result hashes like `self`. See [`union_assign()`](Self::union_assign).
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`CapacityMismatch`](crate::error::ErrorKind::CapacityMismatch)
    /// if the sizes differ.
    pub fn union(&self, other: &Self) -> Result<Self, Error> {
        self.check_compatible("union", other)?;
        let mut result = self.clone();
        result.union_assign(other)?;
        Ok(result)
    }

    /// Returns a new filter holding the bitwise AND of `self` and `other`.
    ///
    /// The result hashes like `self` and carries the same caveats as
    /// [`intersection_assign()`](Self::intersection_assign).
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`CapacityMismatch`](crate::error::ErrorKind::CapacityMismatch)
    /// if the sizes differ.
    pub fn intersection(&self, other: &Self) -> Result<Self, Error> {
        self.check_compatible("intersect", other)?;
        let mut result = self.clone();
        result.intersection_assign(other)?;
        Ok(result)
    }
}

impl<T: ?Sized, H: HashComposer<T>> BloomFilter<T, H> {
    /// Creates an empty filter of `num_bits` bits hashing with an explicit composer.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `num_bits` is outside `[MIN_NUM_BITS, MAX_NUM_BITS]` or the composer produces no
    /// index (or more than [`MAX_NUM_HASHES`]) per element.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// # use bloomfilter::hash::IndependentHashes;
    /// # use bloomfilter::hash::XxHashStrategy;
    /// let hasher = IndependentHashes::new(vec![
    ///     XxHashStrategy::with_seed(13),
    ///     XxHashStrategy::with_seed(17),
    ///     XxHashStrategy::with_seed(19),
    /// ]);
    /// let mut filter = BloomFilter::<u64, _>::with_hasher(8, hasher).unwrap();
    /// filter.insert(&1u64);
    /// assert!(filter.contains(&1u64));
    ///
    /// let empty = IndependentHashes::<XxHashStrategy>::new(vec![]);
    /// assert!(BloomFilter::<u64, _>::with_hasher(8, empty).is_err());
    /// ```
    pub fn with_hasher(num_bits: u64, hasher: H) -> Result<Self, Error> {
        if !(MIN_NUM_BITS..=MAX_NUM_BITS).contains(&num_bits) {
            return Err(Error::invalid_argument(format!(
                "num_bits must be between {MIN_NUM_BITS} and {MAX_NUM_BITS}"
            ))
            .with_context("num_bits", num_bits));
        }
        let num_hashes = hasher.num_hashes();
        if !(MIN_NUM_HASHES..=MAX_NUM_HASHES).contains(&num_hashes) {
            return Err(Error::invalid_argument(format!(
                "num_hashes must be between {MIN_NUM_HASHES} and {MAX_NUM_HASHES}"
            ))
            .with_context("num_hashes", num_hashes));
        }
        Ok(Self::from_parts(num_bits, hasher))
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::<str>::new(1024);
    /// filter.insert("apple");
    ///
    /// assert!(filter.contains("apple")); // true - was inserted
    /// assert!(!filter.contains("grape")); // false - never inserted
    /// ```
    pub fn contains(&self, item: &T) -> bool {
        if self.is_empty() {
            return false;
        }

        self.hasher
            .bit_indices(item, self.num_bits)
            .all(|bit_index| get_bit(&self.bit_array, bit_index))
    }

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will return `true` until the filter is cleared.
    /// Inserting the same item again has no effect.
    pub fn insert(&mut self, item: &T) {
        let num_bits = self.num_bits;
        for bit_index in self.hasher.bit_indices(item, num_bits) {
            debug_assert!(bit_index < num_bits, "bit index {bit_index} out of range");
            if set_bit(&mut self.bit_array, bit_index) {
                self.num_bits_set += 1;
            }
        }
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::<u64>::new(1024);
    ///
    /// assert!(!filter.contains_and_insert(&42)); // First insertion
    /// assert!(filter.contains_and_insert(&42)); // Now it's in the set
    /// ```
    pub fn contains_and_insert(&mut self, item: &T) -> bool {
        let num_bits = self.num_bits;
        let mut was_present = true;
        for bit_index in self.hasher.bit_indices(item, num_bits) {
            debug_assert!(bit_index < num_bits, "bit index {bit_index} out of range");
            if set_bit(&mut self.bit_array, bit_index) {
                self.num_bits_set += 1;
                was_present = false;
            }
        }
        was_present
    }

    /// Returns the number of hash functions (k) applied per item.
    pub fn num_hashes(&self) -> u16 {
        self.hasher.num_hashes()
    }

    /// Estimates the current false positive probability.
    ///
    /// Uses the approximation `load_factor^k`, which assumes uniformly distributed bits.
    pub fn estimated_fpp(&self) -> f64 {
        let k = i32::from(self.num_hashes());
        self.load_factor().powi(k)
    }
}

impl<'a, T: ?Sized + 'a, H: HashComposer<T>> Extend<&'a T> for BloomFilter<T, H> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: ?Sized, H: Clone> Clone for BloomFilter<T, H> {
    fn clone(&self) -> Self {
        BloomFilter {
            hasher: self.hasher.clone(),
            num_bits: self.num_bits,
            num_bits_set: self.num_bits_set,
            bit_array: self.bit_array.clone(),
            _item: PhantomData,
        }
    }
}

impl<T: ?Sized, H: PartialEq> PartialEq for BloomFilter<T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.num_bits == other.num_bits
            && self.hasher == other.hasher
            && self.bit_array == other.bit_array
    }
}

impl<T: ?Sized, H: Eq> Eq for BloomFilter<T, H> {}

impl<T: ?Sized, H: fmt::Debug> fmt::Debug for BloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("hasher", &self.hasher)
            .field("num_bits", &self.num_bits)
            .field("num_bits_set", &self.num_bits_set)
            .finish_non_exhaustive()
    }
}

/// Gets the value of a single bit.
fn get_bit(bit_array: &[u64], bit_index: u64) -> bool {
    let word_index = (bit_index >> 6) as usize; // Equivalent to bit_index / 64
    let mask = 1u64 << (bit_index & 63);
    (bit_array[word_index] & mask) != 0
}

/// Sets a single bit, returning whether it was previously unset.
fn set_bit(bit_array: &mut [u64], bit_index: u64) -> bool {
    let word_index = (bit_index >> 6) as usize;
    let mask = 1u64 << (bit_index & 63);
    let word = &mut bit_array[word_index];
    let newly_set = (*word & mask) == 0;
    *word |= mask;
    newly_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloom::BloomFilterBuilder;
    use crate::error::ErrorKind;
    use crate::hash::FnHash;
    use crate::hash::HashStrategy;

    fn popcount<T: ?Sized, H>(filter: &BloomFilter<T, H>) -> u64 {
        filter
            .bit_array
            .iter()
            .map(|w| u64::from(w.count_ones()))
            .sum()
    }

    #[test]
    fn test_word_layout() {
        let filter = BloomFilter::<u64>::new(65);
        assert_eq!(filter.bit_array.len(), 2);
        assert_eq!(filter.size(), 65);

        let filter = BloomFilter::<u64>::new(64);
        assert_eq!(filter.bit_array.len(), 1);
    }

    #[test]
    fn test_bits_past_size_stay_clear() {
        let mut filter = BloomFilter::<u64>::with_num_hashes(70, 5);
        for i in 0..1000u64 {
            filter.insert(&i);
        }
        assert_eq!(filter.bit_array[1] >> 6, 0);
        assert_eq!(filter.bits_used(), popcount(&filter));
    }

    #[test]
    fn test_bits_used_tracks_every_operation() {
        let mut f1 = BloomFilterBuilder::with_size(500, 4).build::<u64>();
        let mut f2 = BloomFilterBuilder::with_size(500, 4).build::<u64>();
        for i in 0..40u64 {
            f1.insert(&i);
            f2.contains_and_insert(&(i + 20));
        }
        assert_eq!(f1.bits_used(), popcount(&f1));
        assert_eq!(f2.bits_used(), popcount(&f2));

        let union = f1.union(&f2).unwrap();
        assert_eq!(union.bits_used(), popcount(&union));

        f1.intersection_assign(&f2).unwrap();
        assert_eq!(f1.bits_used(), popcount(&f1));

        f1.clear();
        assert_eq!(f1.bits_used(), 0);
        assert_eq!(popcount(&f1), 0);
    }

    #[test]
    fn test_insert_sets_exactly_the_derived_bits() {
        fn low(x: &u64) -> u64 {
            *x
        }
        fn high(x: &u64) -> u64 {
            *x + 64
        }
        let hasher = IndependentHashes::new(vec![
            FnHash(low as fn(&u64) -> u64),
            FnHash(high as fn(&u64) -> u64),
        ]);
        let mut filter = BloomFilter::<u64, _>::with_hasher(128, hasher).unwrap();
        filter.insert(&3);
        assert_eq!(filter.bit_array[0], 1 << 3);
        assert_eq!(filter.bit_array[1], 1 << 3);
        assert_eq!(filter.bits_used(), 2);

        filter.insert(&3);
        assert_eq!(filter.bits_used(), 2);
    }

    #[test]
    fn test_overshooting_strategy_stays_inside_size() {
        struct Overshoot;

        impl HashStrategy<u64> for Overshoot {
            fn hash_index(&self, item: &u64, num_bits: u64) -> u64 {
                // Indices 70..=72 lie past the size but inside the second word.
                num_bits + *item % 3
            }
        }

        let hasher = IndependentHashes::new(vec![Overshoot]);
        let mut filter = BloomFilter::<u64, _>::with_hasher(70, hasher).unwrap();
        for i in 0..10u64 {
            filter.insert(&i);
            assert!(filter.contains(&i));
        }
        assert_eq!(filter.bit_array[1] >> 6, 0);
        assert_eq!(filter.bit_array[0], 0b111);
        assert_eq!(filter.bits_used(), popcount(&filter));
    }

    #[test]
    fn test_with_hasher_rejects_invalid_config() {
        let hasher = IndependentHashes::<MurmurHashStrategy>::with_primes(3, 0);
        let err = BloomFilter::<u64, _>::with_hasher(0, hasher).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let hasher = IndependentHashes::<MurmurHashStrategy>::new(vec![]);
        let err = BloomFilter::<u64, _>::with_hasher(64, hasher).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.context()[0].0, "num_hashes");
    }

    #[test]
    fn test_mismatch_leaves_operands_untouched() {
        let mut small = BloomFilter::<u64>::new(8);
        let mut large = BloomFilter::<u64>::new(32);
        small.insert(&1);
        large.insert(&2);
        let (small_before, large_before) = (small.clone(), large.clone());

        let err = small.union_assign(&large).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityMismatch);
        let err = large.intersection_assign(&small).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityMismatch);

        assert_eq!(small, small_before);
        assert_eq!(large, large_before);
    }

    #[test]
    fn test_estimated_fpp() {
        let mut filter = BloomFilterBuilder::with_size(1000, 5).build::<u64>();
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.estimated_fpp(), 0.0);

        for i in 0..100u64 {
            filter.insert(&i);
        }
        let expected = filter.load_factor().powi(5);
        assert!((filter.estimated_fpp() - expected).abs() < 1e-12);
        assert!(filter.estimated_fpp() < 0.1);
    }

    #[test]
    fn test_debug_omits_bits() {
        let filter = BloomFilterBuilder::with_size(16, 2).build_double_hashing::<u64>();
        let debug = format!("{filter:?}");
        assert!(debug.starts_with("BloomFilter { hasher: DoubleHashing"));
        assert!(debug.contains("num_bits: 16"));
        assert!(!debug.contains("bit_array"));
    }
}
