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

//! General-purpose map: equality decided by a comparator, default `PartialEq`.

use std::hash::Hash;
use std::ops::Index;

use crate::dialect::Generic;
use crate::error::Error;
use crate::error::Result;
use crate::hash::hash_key;
use crate::table::RawTable;

const DEFAULT_CAPACITY: usize = 16;
const DEFAULT_LOAD_FACTOR: f64 = 0.88;

type DefaultComparator<K> = fn(&K, &K) -> bool;

fn default_comparator<K: PartialEq>(a: &K, b: &K) -> bool {
    a == b
}

/// A bounded-probe Robin Hood hash map keyed by an arbitrary `K: Hash`.
///
/// Equality between keys is decided by a comparator fixed at construction
/// time (structural `PartialEq` by default via [`MapBuilder`]), never by
/// `K`'s hash alone — see [`crate::numeric_map::NumericMap`] for the
/// hash-equality dialect.
pub struct Map<K, V, C = DefaultComparator<K>>
where
    C: Fn(&K, &K) -> bool,
{
    table: RawTable<K, V, Generic<K, C>>,
}

impl<K, V> Map<K, V, DefaultComparator<K>>
where
    K: Hash + PartialEq,
{
    /// Starts a builder with the default capacity (16), load factor (0.88),
    /// and `PartialEq`-based comparator.
    pub fn builder() -> MapBuilder<K, V, DefaultComparator<K>> {
        MapBuilder::default()
    }

    /// Creates a map with default capacity and load factor.
    pub fn new() -> Self {
        Self::builder().build()
    }
}

impl<K, V> Default for Map<K, V, DefaultComparator<K>>
where
    K: Hash + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Map<K, V, C>
where
    K: Hash,
    C: Fn(&K, &K) -> bool,
{
    /// Inserts `(key, value)`. Returns `false` without modifying the map if
    /// `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = hash_key(&key);
        self.table.insert(key, value, hash)
    }

    /// Looks up `key`, returning its value if present.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = hash_key(key);
        self.table.get(key, hash)
    }

    /// Looks up `key`, returning [`Error::KeyNotFound`] if absent.
    pub fn index_get(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Overwrites the value for `key` if present; silent no-op otherwise.
    pub fn update(&mut self, key: &K, value: V) {
        let hash = hash_key(key);
        self.table.update(key, value, hash);
    }

    /// Removes `key` via backshift deletion; silent no-op if absent.
    pub fn remove(&mut self, key: &K) {
        let hash = hash_key(key);
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

impl<K, V, C> Index<&K> for Map<K, V, C>
where
    K: Hash,
    C: Fn(&K, &K) -> bool,
{
    type Output = V;

    /// Panics if `key` is absent, matching the standard library's own
    /// `Index` convention for associative containers.
    fn index(&self, key: &K) -> &V {
        let hash = hash_key(key);
        self.table.get(key, hash).expect("key not found")
    }
}

/// Builder for [`Map`].
///
/// # Panics
///
/// Setters validate their argument immediately (e.g. `load_factor` must be
/// in `(0.0, 1.0)`) rather than deferring the error to [`build`](Self::build).
pub struct MapBuilder<K, V, C = DefaultComparator<K>>
where
    C: Fn(&K, &K) -> bool,
{
    capacity: usize,
    load_factor: f64,
    comparator: C,
    _marker: std::marker::PhantomData<(K, V)>,
}

impl<K, V> Default for MapBuilder<K, V, DefaultComparator<K>>
where
    K: PartialEq,
{
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            comparator: default_comparator::<K>,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<K, V, C> MapBuilder<K, V, C>
where
    C: Fn(&K, &K) -> bool,
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

    /// Sets a custom key-equality comparator, replacing `PartialEq`.
    ///
    /// The comparator must agree with `K`'s [`Hash`] impl: keys it reports
    /// equal must also hash equal, since the duplicate-key pre-check and
    /// every lookup locate the probe window from the query key's own hash
    /// before the comparator ever runs. A comparator that relaxes equality
    /// without a matching relaxation in `Hash` (e.g. case-folding `Hash`)
    /// will silently fail to find keys whose hash disagrees.
    pub fn comparator<C2>(self, comparator: C2) -> MapBuilder<K, V, C2>
    where
        C2: Fn(&K, &K) -> bool,
    {
        MapBuilder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            comparator,
            _marker: std::marker::PhantomData,
        }
    }

    /// Builds the map.
    pub fn build(self) -> Map<K, V, C> {
        let dialect = Generic::new(self.comparator);
        Map {
            table: RawTable::new(self.capacity, self.load_factor, dialect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_insert_lookup_scenario() {
        let mut map = Map::new();
        map.insert(1, "a");
        map.insert(2, "b");
        map.insert(3, "c");
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&2), Some(&"b"));
        assert_eq!(map.get(&4), None);
    }

    #[test]
    fn update_then_lookup_and_update_of_absent_key() {
        let mut map = Map::new();
        map.insert(5, "x");
        map.update(&5, "y");
        assert_eq!(map.get(&5), Some(&"y"));

        map.update(&99, "z");
        assert_eq!(map.get(&99), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn index_get_distinguishes_absence_as_an_error() {
        let mut map = Map::new();
        map.insert(1, "a");
        assert_eq!(map.index_get(&1), Ok(&"a"));
        assert_eq!(map.index_get(&2), Err(Error::KeyNotFound));
    }

    #[test]
    fn index_operator_returns_the_stored_value() {
        let mut map = Map::new();
        map.insert(1, "a");
        assert_eq!(map[&1], "a");
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn index_operator_panics_on_absent_key() {
        let map: Map<i32, &str> = Map::new();
        let _ = map[&1];
    }

    #[test]
    fn builder_accepts_a_custom_comparator() {
        // `OrderedPair` carries `(a, b)` but treats it as equal to its swap;
        // `Hash` must agree, so it hashes the pair in sorted order.
        #[derive(Clone)]
        struct OrderedPair(i32, i32);

        impl Hash for OrderedPair {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                let (lo, hi) = if self.0 <= self.1 { (self.0, self.1) } else { (self.1, self.0) };
                lo.hash(state);
                hi.hash(state);
            }
        }

        let mut map = Map::builder()
            .comparator(|a: &OrderedPair, b: &OrderedPair| {
                (a.0 == b.0 && a.1 == b.1) || (a.0 == b.1 && a.1 == b.0)
            })
            .build();
        map.insert(OrderedPair(1, 2), "first");
        assert_eq!(map.get(&OrderedPair(2, 1)), Some(&"first"));
        assert!(!map.insert(OrderedPair(2, 1), "second"));
    }

    #[test]
    #[should_panic(expected = "load_factor must be in")]
    fn builder_rejects_out_of_range_load_factor() {
        let _ = Map::<i32, i32>::builder().load_factor(1.5);
    }
}
