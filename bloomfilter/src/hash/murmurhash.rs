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

use byteorder::ByteOrder;
use byteorder::LE;

use super::HashStrategy;

const C1: u64 = 0x87c37b91114253d5;
const C2: u64 = 0x4cf5ad432745937f;
const BLOCK_LEN: usize = 16;

/// Streaming MurmurHash3 (x64, 128-bit variant).
///
/// Bytes written through [`Hasher::write`] are consumed in 16-byte blocks; a partial block is
/// buffered until the next write or until [`finish128`](Self::finish128).
#[derive(Debug, Clone)]
pub struct MurmurHash3X64128 {
    h1: u64,
    h2: u64,
    len: u64,
    pending: [u8; BLOCK_LEN],
    pending_len: usize,
}

impl MurmurHash3X64128 {
    /// Creates a hasher whose two lanes both start at `seed`.
    pub fn with_seed(seed: u64) -> Self {
        MurmurHash3X64128 {
            h1: seed,
            h2: seed,
            len: 0,
            pending: [0; BLOCK_LEN],
            pending_len: 0,
        }
    }

    /// Returns both 64-bit halves of the digest without consuming the hasher.
    pub fn finish128(&self) -> (u64, u64) {
        let mut h1 = self.h1;
        let mut h2 = self.h2;

        let tail = &self.pending[..self.pending_len];
        if !tail.is_empty() {
            let mut block = [0u8; BLOCK_LEN];
            block[..tail.len()].copy_from_slice(tail);
            if tail.len() > 8 {
                h2 ^= scramble_k2(LE::read_u64(&block[8..]));
            }
            h1 ^= scramble_k1(LE::read_u64(&block[..8]));
        }

        h1 ^= self.len;
        h2 ^= self.len;
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        h1 = fmix64(h1);
        h2 = fmix64(h2);
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        (h1, h2)
    }

    fn consume_block(&mut self, block: &[u8]) {
        let k1 = LE::read_u64(&block[..8]);
        let k2 = LE::read_u64(&block[8..]);

        self.h1 ^= scramble_k1(k1);
        self.h1 = self
            .h1
            .rotate_left(27)
            .wrapping_add(self.h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dce729);

        self.h2 ^= scramble_k2(k2);
        self.h2 = self
            .h2
            .rotate_left(31)
            .wrapping_add(self.h1)
            .wrapping_mul(5)
            .wrapping_add(0x38495ab5);
    }
}

impl Hasher for MurmurHash3X64128 {
    fn write(&mut self, mut bytes: &[u8]) {
        self.len += bytes.len() as u64;

        if self.pending_len > 0 {
            let take = (BLOCK_LEN - self.pending_len).min(bytes.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&bytes[..take]);
            self.pending_len += take;
            bytes = &bytes[take..];
            if self.pending_len < BLOCK_LEN {
                return;
            }
            let block = self.pending;
            self.consume_block(&block);
            self.pending_len = 0;
        }

        let mut blocks = bytes.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            self.consume_block(block);
        }
        let rest = blocks.remainder();
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }

    fn finish(&self) -> u64 {
        self.finish128().0
    }
}

fn scramble_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}

fn scramble_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^= k >> 33;
    k
}

/// Independent seeded hashing: one MurmurHash3 function per seed.
///
/// Each strategy in a filter should carry a distinct seed (conventionally a distinct prime, see
/// [`IndependentHashes::with_primes`](super::IndependentHashes::with_primes)); the first half of
/// the 128-bit digest is reduced modulo the filter size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MurmurHashStrategy {
    seed: u64,
}

impl MurmurHashStrategy {
    /// Creates a strategy hashing with the given seed.
    pub const fn with_seed(seed: u64) -> Self {
        MurmurHashStrategy { seed }
    }

    /// Returns the seed of this strategy.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<T: Hash + ?Sized> HashStrategy<T> for MurmurHashStrategy {
    fn hash_index(&self, item: &T, num_bits: u64) -> u64 {
        let mut hasher = MurmurHash3X64128::with_seed(self.seed);
        item.hash(&mut hasher);
        hasher.finish128().0 % num_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(seed: u64, chunks: &[&[u8]]) -> (u64, u64) {
        let mut hasher = MurmurHash3X64128::with_seed(seed);
        for chunk in chunks {
            hasher.write(chunk);
        }
        hasher.finish128()
    }

    const REFERENCE_VECTORS: [(&[u8], u64, u64); 6] = [
        // tail > 8
        (
            b"The quick brown fox jumps over the lazy dog",
            0xe34bbc7bbc071b6c,
            0x7a433ca9c49a9347,
        ),
        // one bit flipped
        (
            b"The quick brown fox jumps over the lazy eog",
            0x362108102c62d1c9,
            0x3285cd100292b305,
        ),
        // tail < 8
        (
            b"The quick brown fox jumps over the lazy dogdogdog",
            0x9c8205300e612fc4,
            0xcbc0af6136aa3df9,
        ),
        // tail = 8
        (
            b"The quick brown fox jumps over the lazy1",
            0xe3301a827e5cdfe3,
            0xbdbf05f8da0f0392,
        ),
        // tail = 0
        (
            b"The quick brown fox jumps over t",
            0xdf6af91bb29bdacf,
            0x91a341c58df1f3a6,
        ),
        // a ones byte and a zeros byte
        (
            b"The quick brown fox jumps over the lazy dog\xffdog\x00",
            0xe88abda785929c9e,
            0x96b98587cacc83d6,
        ),
    ];

    #[test]
    fn test_reference_vectors() {
        for (key, h1, h2) in REFERENCE_VECTORS {
            assert_eq!(digest(0, &[key]), (h1, h2), "key: {key:?}");
        }
    }

    #[test]
    fn test_reference_vectors_byte_by_byte() {
        for (key, h1, h2) in REFERENCE_VECTORS {
            let single_bytes: Vec<&[u8]> = key.chunks(1).collect();
            assert_eq!(digest(0, &single_bytes), (h1, h2), "key: {key:?}");
        }
    }

    #[test]
    fn test_empty_input_seed_zero() {
        assert_eq!(digest(0, &[]), (0, 0));
    }

    #[test]
    fn test_chunking_does_not_change_digest() {
        let data: Vec<u8> = (0u8..=100).collect();
        let whole = digest(7, &[&data[..]]);

        assert_eq!(whole, digest(7, &[&data[..3], &data[3..20], &data[20..]]));
        assert_eq!(whole, digest(7, &[&data[..16], &data[16..32], &data[32..]]));
        let single_bytes: Vec<&[u8]> = data.chunks(1).collect();
        assert_eq!(whole, digest(7, &single_bytes));
    }

    #[test]
    fn test_seed_changes_digest() {
        assert_ne!(digest(2, &[&b"bloom"[..]]), digest(3, &[&b"bloom"[..]]));
    }

    #[test]
    fn test_strategy_index_in_range() {
        let strategy = MurmurHashStrategy::with_seed(11);
        for num_bits in [1u64, 7, 64, 65, 1000] {
            for i in 0..200u64 {
                assert!(strategy.hash_index(&i, num_bits) < num_bits);
            }
        }
    }

    #[test]
    fn test_strategy_is_deterministic() {
        let a = MurmurHashStrategy::with_seed(13);
        let b = MurmurHashStrategy::with_seed(13);
        assert_eq!(a.hash_index("apple", 4096), b.hash_index("apple", 4096));
    }
}
