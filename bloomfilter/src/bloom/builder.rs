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

use super::BloomFilter;
use crate::hash::DEFAULT_SEED;
use crate::hash::DoubleHashing;
use crate::hash::IndependentHashes;
use crate::hash::XxHashStrategy;

/// Smallest accepted filter size in bits.
pub const MIN_NUM_BITS: u64 = 1;
/// Largest accepted filter size in bits.
pub const MAX_NUM_BITS: u64 = i32::MAX as u64 * 64;
/// Smallest accepted number of hash functions.
pub const MIN_NUM_HASHES: u16 = 1;
/// Largest accepted number of hash functions.
pub const MAX_NUM_HASHES: u16 = i16::MAX as u16;
/// Number of hash functions used when the caller does not choose one.
pub const DEFAULT_NUM_HASHES: u16 = 3;

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify target items and false positive rate
///   (recommended)
/// - [`with_size()`](Self::with_size): Specify bit count and hash functions (manual)
///
/// and three hash families to finish with: [`build()`](Self::build) (independent seeded
/// MurmurHash3), [`build_xxhash()`](Self::build_xxhash) (independent seeded XxHash64) and
/// [`build_double_hashing()`](Self::build_double_hashing).
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    num_bits: u64,
    num_hashes: u16,
    seed: u64,
}

impl BloomFilterBuilder {
    /// Creates a builder with optimal parameters for a target accuracy.
    ///
    /// Automatically calculates the optimal number of bits and hash functions
    /// to achieve the desired false positive probability for a given number of items.
    ///
    /// # Arguments
    ///
    /// - `max_items`: Maximum expected number of distinct items
    /// - `fpp`: Target false positive probability (e.g., 0.01 for 1%)
    ///
    /// # Panics
    ///
    /// Panics if `max_items` is 0 or `fpp` is not in (0.0, 1.0].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// // Optimal for 10,000 items with 1% FPP
    /// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.01)
    ///     .seed(42)
    ///     .build::<str>();
    /// assert_eq!(filter.num_hashes(), 7);
    /// ```
    pub fn with_accuracy(max_items: u64, fpp: f64) -> Self {
        assert!(max_items > 0, "max_items must be greater than 0");
        assert!(
            fpp > 0.0 && fpp <= 1.0,
            "fpp must be between 0.0 and 1.0 (inclusive of 1.0)"
        );

        let num_bits = Self::suggest_num_bits(max_items, fpp);
        let num_hashes = Self::suggest_num_hashes_from_accuracy(max_items, num_bits);

        BloomFilterBuilder {
            num_bits,
            num_hashes,
            seed: DEFAULT_SEED,
        }
    }

    /// Creates a builder with manual size specification.
    ///
    /// The filter will report exactly `num_bits` from [`BloomFilter::size()`].
    ///
    /// # Panics
    ///
    /// Panics if any of:
    /// - `num_bits` < [`MIN_NUM_BITS`] or `num_bits` > [`MAX_NUM_BITS`]
    /// - `num_hashes` < [`MIN_NUM_HASHES`] or `num_hashes` > [`MAX_NUM_HASHES`]
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(10_000, 7).build::<u64>();
    /// assert_eq!(filter.size(), 10_000);
    /// ```
    pub fn with_size(num_bits: u64, num_hashes: u16) -> Self {
        check_num_bits(num_bits);
        check_num_hashes(num_hashes);

        BloomFilterBuilder {
            num_bits,
            num_hashes,
            seed: DEFAULT_SEED,
        }
    }

    /// Sets a custom base hash seed (default: 9001).
    ///
    /// Filters built with different seeds can still be combined when their sizes match, but
    /// the combined bits no longer describe either element set.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds a filter hashing with `k` independent MurmurHash3 functions.
    ///
    /// Function `i` is seeded with the base seed plus the `i`-th prime.
    pub fn build<T: Hash + ?Sized>(self) -> BloomFilter<T> {
        let hasher = IndependentHashes::with_primes(self.num_hashes, self.seed);
        BloomFilter::from_parts(self.num_bits, hasher)
    }

    /// Builds a filter hashing with `k` independent XxHash64 functions.
    ///
    /// Function `i` is seeded with the base seed plus the `i`-th prime.
    pub fn build_xxhash<T: Hash + ?Sized>(
        self,
    ) -> BloomFilter<T, IndependentHashes<XxHashStrategy>> {
        let hasher = IndependentHashes::with_primes(self.num_hashes, self.seed);
        BloomFilter::from_parts(self.num_bits, hasher)
    }

    /// Builds a filter deriving all `k` indices from two XxHash64 computations.
    pub fn build_double_hashing<T: Hash + ?Sized>(self) -> BloomFilter<T, DoubleHashing> {
        let hasher = DoubleHashing::new(self.num_hashes, self.seed);
        BloomFilter::from_parts(self.num_bits, hasher)
    }

    /// Suggests optimal number of bits given max items and target FPP.
    ///
    /// Formula: `m = -n * ln(p) / (ln(2)^2)`
    /// where n = max_items, p = fpp
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let bits = BloomFilterBuilder::suggest_num_bits(1000, 0.01);
    /// assert!(bits > 9000 && bits < 10000); // ~9585 bits
    /// ```
    pub fn suggest_num_bits(max_items: u64, fpp: f64) -> u64 {
        let n = max_items as f64;
        let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;

        let bits = (-n * fpp.ln() / ln2_squared).ceil() as u64;
        bits.clamp(MIN_NUM_BITS, MAX_NUM_BITS)
    }

    /// Suggests optimal number of hash functions given max items and bit count.
    ///
    /// Formula: `k = (m/n) * ln(2)`
    /// where m = num_bits, n = max_items
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let hashes = BloomFilterBuilder::suggest_num_hashes_from_accuracy(1000, 10000);
    /// assert_eq!(hashes, 7); // Optimal k ≈ 6.93
    /// ```
    pub fn suggest_num_hashes_from_accuracy(max_items: u64, num_bits: u64) -> u16 {
        let m = num_bits as f64;
        let n = max_items as f64;

        // Ceil to avoid selecting too few hashes.
        let k = (m / n * std::f64::consts::LN_2).ceil();
        k.clamp(f64::from(MIN_NUM_HASHES), f64::from(MAX_NUM_HASHES)) as u16
    }

    /// Suggests optimal number of hash functions from target FPP.
    ///
    /// Formula: `k = -log2(p)`
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let hashes = BloomFilterBuilder::suggest_num_hashes_from_fpp(0.01);
    /// assert_eq!(hashes, 7); // -log2(0.01) ≈ 6.64
    /// ```
    pub fn suggest_num_hashes_from_fpp(fpp: f64) -> u16 {
        let k = -fpp.log2();
        k.ceil()
            .clamp(f64::from(MIN_NUM_HASHES), f64::from(MAX_NUM_HASHES)) as u16
    }
}

pub(super) fn check_num_bits(num_bits: u64) {
    assert!(
        num_bits >= MIN_NUM_BITS,
        "num_bits must be at least {MIN_NUM_BITS}"
    );
    assert!(
        num_bits <= MAX_NUM_BITS,
        "num_bits must not exceed {MAX_NUM_BITS}"
    );
}

pub(super) fn check_num_hashes(num_hashes: u16) {
    assert!(
        num_hashes >= MIN_NUM_HASHES,
        "num_hashes must be at least {MIN_NUM_HASHES}"
    );
    assert!(
        num_hashes <= MAX_NUM_HASHES,
        "num_hashes must not exceed {MAX_NUM_HASHES}"
    );
}
