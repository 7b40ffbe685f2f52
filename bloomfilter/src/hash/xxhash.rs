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
use std::hash::Hasher;

use twox_hash::XxHash64;

use super::HashStrategy;

/// Hashes `item` with XxHash64 under `seed`.
pub(crate) fn xxhash64<T: Hash + ?Sized>(item: &T, seed: u64) -> u64 {
    let mut hasher = XxHash64::with_seed(seed);
    item.hash(&mut hasher);
    hasher.finish()
}

/// General-purpose bit-mixing hashing backed by XxHash64.
///
/// Any type implementing [`Hash`] can be digested. Give every strategy in a filter its own seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XxHashStrategy {
    seed: u64,
}

impl XxHashStrategy {
    /// Creates a strategy hashing with the given seed.
    pub const fn with_seed(seed: u64) -> Self {
        XxHashStrategy { seed }
    }

    /// Returns the seed of this strategy.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<T: Hash + ?Sized> HashStrategy<T> for XxHashStrategy {
    fn hash_index(&self, item: &T, num_bits: u64) -> u64 {
        xxhash64(item, self.seed) % num_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_reference_value() {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(&[]);
        assert_eq!(hasher.finish(), 0xef46db3751d8e999);
    }

    #[test]
    fn test_distinct_seeds_disagree() {
        let indices: Vec<u64> = (0..8)
            .map(|seed| XxHashStrategy::with_seed(seed).hash_index(&42u64, 1 << 20))
            .collect();
        let mut deduped = indices.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert!(deduped.len() > 1, "all seeds mapped to {indices:?}");
    }
}
