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

//! The variant hook: how a table decides two stored keys are the same one.
//!
//! [`Generic`] and [`Numeric`] are the table's two dialects. Both are
//! monomorphized into [`crate::table::RawTable`] rather than boxed, so
//! `same_key` inlines into the probe loop instead of going through a vtable.

use std::marker::PhantomData;

/// Decides key equality for a probe window scan.
///
/// `PSL_SHORT_CIRCUIT` controls whether the scan may stop early using the
/// Robin Hood PSL-monotonicity invariant (sound only when equality is
/// decided purely from the stored hash, never from a user comparator that
/// could disagree with hash equality).
pub trait Dialect<K> {
    /// When true, a lookup may stop scanning once it sees a stored PSL
    /// strictly smaller than the previous slot's PSL.
    const PSL_SHORT_CIRCUIT: bool;

    /// Reports whether a stored slot holds the same logical key as a query.
    fn same_key(&self, stored_key: &K, stored_hash: u32, query_key: &K, query_hash: u32) -> bool;
}

/// The general-purpose dialect: equality via a caller-supplied comparator.
pub struct Generic<K, C> {
    comparator: C,
    _marker: PhantomData<fn(&K)>,
}

impl<K, C> Generic<K, C>
where
    C: Fn(&K, &K) -> bool,
{
    pub fn new(comparator: C) -> Self {
        Self {
            comparator,
            _marker: PhantomData,
        }
    }
}

impl<K, C> Dialect<K> for Generic<K, C>
where
    C: Fn(&K, &K) -> bool,
{
    const PSL_SHORT_CIRCUIT: bool = false;

    fn same_key(&self, stored_key: &K, _stored_hash: u32, query_key: &K, _query_hash: u32) -> bool {
        (self.comparator)(stored_key, query_key)
    }
}

/// The numeric dialect: equality via full-hash comparison, never touching
/// `K` itself. Sound only for [`NumericKey`] implementors, whose identity
/// hash is injective over the key domain.
pub struct Numeric<K> {
    _marker: PhantomData<fn(&K)>,
}

impl<K> Numeric<K> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<K> Default for Numeric<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Dialect<K> for Numeric<K>
where
    K: NumericKey,
{
    const PSL_SHORT_CIRCUIT: bool = true;

    fn same_key(&self, _stored_key: &K, stored_hash: u32, _query_key: &K, query_hash: u32) -> bool {
        stored_hash == query_hash
    }
}

mod private {
    pub trait Sealed {}
}

/// A fixed-size, bit-comparable key usable with the numeric dialect.
///
/// Sealed to `u32`/`i32`: these are exactly the types for which identity
/// hashing is injective, which is what lets [`Numeric`] decide equality from
/// the stored hash alone rather than from `K::eq` (see the numeric variant's
/// precondition discussion).
pub trait NumericKey: private::Sealed + Copy + Eq {
    /// Hashes `self` to 32 bits. For the sealed implementors this is the
    /// identity function on the key's bit pattern.
    fn identity_hash(self) -> u32;
}

macro_rules! impl_numeric_key {
    ($name:ty) => {
        impl private::Sealed for $name {}

        impl NumericKey for $name {
            #[inline(always)]
            fn identity_hash(self) -> u32 {
                self as u32
            }
        }
    };
}

impl_numeric_key!(u32);
impl_numeric_key!(i32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_dialect_uses_comparator() {
        let dialect = Generic::new(|a: &i32, b: &i32| a == b);
        assert!(dialect.same_key(&5, 0, &5, 0));
        assert!(!dialect.same_key(&5, 0, &6, 0));
    }

    #[test]
    fn numeric_dialect_uses_hash_only() {
        let dialect: Numeric<u32> = Numeric::new();
        assert!(dialect.same_key(&1, 42, &999, 42));
        assert!(!dialect.same_key(&1, 42, &999, 43));
    }

    #[test]
    fn identity_hash_is_bit_pattern() {
        assert_eq!(42u32.identity_hash(), 42);
        assert_eq!((-1i32).identity_hash(), u32::MAX);
    }
}
