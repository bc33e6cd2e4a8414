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

//! Numeric map: fixed-size bit-comparable keys, equality decided by the
//! full hash rather than by key comparison.

pub use crate::dialect::NumericKey;
use crate::dialect::Numeric;
use crate::error::Error;
use crate::error::Result;
use crate::table::RawTable;

const DEFAULT_CAPACITY: usize = 16;
const DEFAULT_LOAD_FACTOR: f64 = 0.88;

/// A bounded-probe Robin Hood hash map keyed by a 32-bit bit-comparable
/// integer (`u32` or `i32`).
///
/// Equality between two stored keys is decided by comparing their identity
/// hashes, never by invoking `K::eq` — sound precisely because
/// [`NumericKey::identity_hash`] is injective over its sealed key types.
/// Prefer [`crate::map::Map`] for key types where that does not hold.
pub struct NumericMap<K, V>
where
    K: NumericKey,
{
    table: RawTable<K, V, Numeric<K>>,
}

impl<K, V> NumericMap<K, V>
where
    K: NumericKey,
{
    /// Starts a builder with the default capacity (16) and load factor (0.88).
    pub fn builder() -> NumericMapBuilder<K, V> {
        NumericMapBuilder::default()
    }

    /// Creates a map with default capacity and load factor.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Inserts `(key, value)`. Returns `false` without modifying the map if
    /// `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = key.identity_hash();
        self.table.insert(key, value, hash)
    }

    /// Looks up `key`, returning its value if present.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = key.identity_hash();
        self.table.get(key, hash)
    }

    /// Looks up `key`, returning [`Error::KeyNotFound`] if absent.
    pub fn index_get(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Overwrites the value for `key` if present; silent no-op otherwise.
    pub fn update(&mut self, key: &K, value: V) {
        let hash = key.identity_hash();
        self.table.update(key, value, hash);
    }

    /// Removes `key` via backshift deletion; silent no-op if absent.
    pub fn remove(&mut self, key: &K) {
        let hash = key.identity_hash();
        self.table.remove(key, hash);
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Length of the backing array, including the probe-limit tail.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }
}

impl<K, V> Default for NumericMap<K, V>
where
    K: NumericKey,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::ops::Index<&K> for NumericMap<K, V>
where
    K: NumericKey,
{
    type Output = V;

    /// Panics if `key` is absent, matching the standard library's own
    /// `Index` convention for associative containers.
    fn index(&self, key: &K) -> &V {
        let hash = key.identity_hash();
        self.table.get(key, hash).expect("key not found")
    }
}

/// Builder for [`NumericMap`].
pub struct NumericMapBuilder<K, V>
where
    K: NumericKey,
{
    capacity: usize,
    load_factor: f64,
    _marker: std::marker::PhantomData<(K, V)>,
}

impl<K, V> Default for NumericMapBuilder<K, V>
where
    K: NumericKey,
{
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<K, V> NumericMapBuilder<K, V>
where
    K: NumericKey,
{
    /// Sets the initial capacity. `0` is coerced to 16; non-power-of-two
    /// values are rounded up.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the load factor.
    ///
    /// # Panics
    ///
    /// If `load_factor` is not in `(0.0, 1.0)`.
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        assert!(
            load_factor > 0.0 && load_factor < 1.0,
            "load_factor must be in (0.0, 1.0), got {load_factor}"
        );
        self.load_factor = load_factor;
        self
    }

    /// Builds the map.
    pub fn build(self) -> NumericMap<K, V> {
        NumericMap {
            table: RawTable::new(self.capacity, self.load_factor, Numeric::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_insert_lookup_scenario() {
        let mut map: NumericMap<u32, &str> = NumericMap::new();
        map.insert(1, "a");
        map.insert(2, "b");
        map.insert(3, "c");
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&2), Some(&"b"));
        assert_eq!(map.get(&4), None);
    }

    #[test]
    fn signed_keys_round_trip() {
        let mut map: NumericMap<i32, i32> = NumericMap::new();
        for k in -50..50 {
            map.insert(k, k * 2);
        }
        for k in -50..50 {
            assert_eq!(map.get(&k), Some(&(k * 2)));
        }
        assert_eq!(map.len(), 100);
    }

    #[test]
    fn remove_then_lookup_odd_keys_survive() {
        let mut map: NumericMap<u32, u32> = NumericMap::new();
        for k in 1..=100u32 {
            map.insert(k, k);
        }
        for k in (2..=100u32).step_by(2) {
            map.remove(&k);
        }
        for k in (1..=100u32).step_by(2) {
            assert_eq!(map.get(&k), Some(&k));
        }
        assert_eq!(map.len(), 50);
    }

    #[test]
    fn resize_absorbs_ten_thousand_clustered_keys() {
        let mut map: NumericMap<u32, u32> = NumericMap::new();
        for k in 0..10_000u32 {
            assert!(map.insert(k, k));
        }
        for k in 0..10_000u32 {
            assert_eq!(map.get(&k), Some(&k));
        }
        assert_eq!(map.len(), 10_000);
    }
}
