// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fibonacci index mapping and the crate's default 32-bit hasher.

use std::hash::Hash;
use std::hash::Hasher;

/// ⌊2^32 / φ⌋, the odd multiplier used by both the Fibonacci index mapping
/// and the default hasher's mixing step.
pub const FIB_MULTIPLIER: u32 = 0x9E3779B9;

/// Maps a 32-bit hash to a home slot via multiply-shift.
///
/// `shift` must be `shift_for_capacity(capacity)` for the table the hash is
/// being mapped into; the high `32 - shift` bits of the product select the
/// home index.
#[inline]
pub fn home_slot(hash: u32, shift: u32) -> usize {
    (hash.wrapping_mul(FIB_MULTIPLIER) >> shift) as usize
}

/// The right-shift amount for a given power-of-two capacity: `32 - lg(capacity)`.
#[inline]
pub fn shift_for_capacity(capacity: usize) -> u32 {
    debug_assert!(capacity.is_power_of_two());
    32 - capacity.trailing_zeros()
}

/// The probe budget for a given power-of-two capacity: `min(15, lg(capacity))`.
#[inline]
pub fn probe_limit_for(capacity: usize) -> u8 {
    capacity.trailing_zeros().min(15) as u8
}

/// A small non-cryptographic 32-bit hasher (multiply-rotate-xor, FxHash-style)
/// used as the default hash for the generic map.
///
/// Not suitable for untrusted input; callers facing adversarial keys should
/// supply their own [`std::hash::BuildHasher`]-compatible strategy upstream
/// of the table, since this crate does not randomize its seed (see the
/// non-goal on adversarial-rehash resistance).
#[derive(Debug, Default)]
pub struct FxHasher32 {
    hash: u32,
}

impl FxHasher32 {
    pub fn new() -> Self {
        Self { hash: 0 }
    }
}

impl Hasher for FxHasher32 {
    fn write(&mut self, bytes: &[u8]) {
        let mut chunks = bytes.chunks_exact(4);
        for chunk in &mut chunks {
            let word = u32::from_ne_bytes(chunk.try_into().unwrap());
            self.hash = (self.hash.rotate_left(5) ^ word).wrapping_mul(FIB_MULTIPLIER);
        }
        let rest = chunks.remainder();
        if !rest.is_empty() {
            let mut buf = [0u8; 4];
            buf[..rest.len()].copy_from_slice(rest);
            let word = u32::from_ne_bytes(buf);
            self.hash = (self.hash.rotate_left(5) ^ word).wrapping_mul(FIB_MULTIPLIER);
        }
    }

    fn finish(&self) -> u64 {
        self.hash as u64
    }
}

/// Hashes an arbitrary `Hash` key down to 32 bits via [`FxHasher32`].
pub fn hash_key<K: Hash + ?Sized>(key: &K) -> u32 {
    let mut hasher = FxHasher32::new();
    key.hash(&mut hasher);
    hasher.finish() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_and_probe_limit_for_minimum_capacity() {
        assert_eq!(shift_for_capacity(16), 28);
        assert_eq!(probe_limit_for(16), 4);
    }

    #[test]
    fn probe_limit_clamps_at_fifteen() {
        // 2^20 has lg = 20, clamped to 15.
        assert_eq!(probe_limit_for(1 << 20), 15);
    }

    #[test]
    fn home_slot_is_within_capacity() {
        let capacity = 1024usize;
        let shift = shift_for_capacity(capacity);
        for h in [0u32, 1, 42, u32::MAX, 0x9E3779B9] {
            assert!(home_slot(h, shift) < capacity);
        }
    }

    #[test]
    fn hash_key_is_deterministic() {
        assert_eq!(hash_key(&"hello"), hash_key(&"hello"));
        assert_ne!(hash_key(&"hello"), hash_key(&"world"));
    }
}
