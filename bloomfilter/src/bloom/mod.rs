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

//! Bloom Filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` returns `true` until the
//!   filter is cleared
//! - **Possible false positives**: `contains()` may return `true` for items never inserted.
//!   With `n` items, `k` hash functions and `m` bits the rate is about `(1 - e^(-kn/m))^k`
//! - **Fixed size**: the bit count and the hash configuration never change after construction
//! - **No deletion**: bits are only ever cleared all at once
//!
//! # Usage
//!
//! ```rust
//! use bloomfilter::bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::<str>::new(2048);
//!
//! // Insert items
//! filter.insert("apple");
//! filter.insert("banana");
//!
//! // Check membership
//! assert!(filter.contains("apple")); // true - definitely inserted
//! assert!(!filter.contains("grape")); // false - never inserted (probably)
//!
//! // Get statistics
//! println!("Size: {} bits", filter.size());
//! println!("Bits used: {}", filter.bits_used());
//! println!("Est. FPP: {:.4}%", filter.estimated_fpp() * 100.0);
//! ```
//!
//! # Creating Filters
//!
//! ## By Accuracy
//!
//! Automatically calculates optimal size and hash functions:
//!
//! ```rust
//! # use bloomfilter::bloom::BloomFilterBuilder;
//! let filter = BloomFilterBuilder::with_accuracy(
//!     10_000, // Expected max items
//!     0.01,   // Target false positive probability (1%)
//! )
//! .seed(9001) // Optional: custom seed
//! .build::<u64>();
//! ```
//!
//! ## By Hash Strategies
//!
//! Any list of [`HashStrategy`](crate::hash::HashStrategy) values can be supplied; each one
//! contributes one bit per element:
//!
//! ```rust
//! # use bloomfilter::bloom::BloomFilter;
//! # use bloomfilter::hash::IndependentHashes;
//! # use bloomfilter::hash::MurmurHashStrategy;
//! // Eight functions seeded with the primes 2, 3, 5, ..., 19.
//! let hasher = IndependentHashes::<MurmurHashStrategy>::with_primes(8, 0);
//! let filter = BloomFilter::<u64, _>::with_hasher(2048, hasher).unwrap();
//! assert_eq!(filter.num_hashes(), 8);
//! ```
//!
//! # Set Operations
//!
//! Filters of the same size can be combined. Combining filters of different sizes fails with
//! [`ErrorKind::CapacityMismatch`](crate::error::ErrorKind::CapacityMismatch):
//!
//! ```rust
//! # use bloomfilter::bloom::BloomFilter;
//! # use bloomfilter::error::ErrorKind;
//! let mut filter1 = BloomFilter::<str>::new(1024);
//! let mut filter2 = BloomFilter::<str>::new(1024);
//!
//! filter1.insert("a");
//! filter2.insert("b");
//!
//! // Union: recognizes items from either filter
//! let union = filter1.union(&filter2).unwrap();
//! assert!(union.contains("a"));
//! assert!(union.contains("b"));
//!
//! // Intersection: approximates items in both filters
//! filter1.intersection_assign(&filter2).unwrap();
//!
//! let other = BloomFilter::<str>::new(512);
//! let err = filter1.union_assign(&other).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::CapacityMismatch);
//! ```
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"

mod builder;
mod filter;

pub use self::builder::BloomFilterBuilder;
pub use self::builder::DEFAULT_NUM_HASHES;
pub use self::builder::MAX_NUM_BITS;
pub use self::builder::MAX_NUM_HASHES;
pub use self::builder::MIN_NUM_BITS;
pub use self::builder::MIN_NUM_HASHES;
pub use self::filter::BloomFilter;
