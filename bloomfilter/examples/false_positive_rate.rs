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

use bloomfilter::bloom::BloomFilter;
use bloomfilter::bloom::BloomFilterBuilder;
use bloomfilter::hash::HashComposer;
use bloomfilter::hash::IndependentHashes;
use bloomfilter::hash::MurmurHashStrategy;

/// Counts how many probes in `0..search_space` match without having been inserted.
fn count_collisions<H: HashComposer<u64>>(
    filter: &BloomFilter<u64, H>,
    inserted: impl Fn(u64) -> bool,
    search_space: u64,
) -> u64 {
    (0..search_space)
        .filter(|&i| !inserted(i) && filter.contains(&i))
        .count() as u64
}

fn main() {
    // A tiny 64-bit filter with eight prime-seeded hash functions and a single element.
    const INSERT_VAL: u64 = 100;
    const SEARCH_SPACE: u64 = 10_000_000;
    const FILTER_SIZE: u64 = 64;

    let hasher = IndependentHashes::<MurmurHashStrategy>::with_primes(8, 0);
    let mut filter = match BloomFilter::<u64, _>::with_hasher(FILTER_SIZE, hasher) {
        Ok(filter) => filter,
        Err(err) => {
            eprintln!("cannot build filter: {err}");
            return;
        }
    };

    println!("bloom size {}", filter.size());
    filter.insert(&INSERT_VAL);
    let collisions = count_collisions(&filter, |i| i == INSERT_VAL, SEARCH_SPACE);
    println!("{collisions} collisions");
    println!(
        "Empirical FPP: {:.6}%, estimated: {:.6}%",
        collisions as f64 / SEARCH_SPACE as f64 * 100.0,
        filter.estimated_fpp() * 100.0
    );

    filter.clear();
    println!(
        "After clear: bits used {}, contains({INSERT_VAL}) = {}",
        filter.bits_used(),
        filter.contains(&INSERT_VAL)
    );

    // A filter sized for its load, compared against (1 - e^(-kn/m))^k.
    println!("\nSizing for 10,000 items at 1% FPP...");
    let max_items = 10_000u64;
    let mut filter = BloomFilterBuilder::with_accuracy(max_items, 0.01).build::<u64>();
    for i in 0..max_items {
        filter.insert(&i);
    }

    let probes = 1_000_000u64;
    let false_positives = (max_items..max_items + probes)
        .filter(|i| filter.contains(i))
        .count();

    let k = f64::from(filter.num_hashes());
    let m = filter.size() as f64;
    let n = max_items as f64;
    let theoretical = (1.0 - (-k * n / m).exp()).powf(k);

    println!("Bits: {}, hashes: {}", filter.size(), filter.num_hashes());
    println!("Load factor: {:.4}", filter.load_factor());
    println!(
        "Empirical FPP: {:.4}%",
        false_positives as f64 / probes as f64 * 100.0
    );
    println!("Theoretical FPP: {:.4}%", theoretical * 100.0);
    println!("Estimated FPP: {:.4}%", filter.estimated_fpp() * 100.0);
}
