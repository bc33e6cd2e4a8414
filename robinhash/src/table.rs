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

//! The bounded-probe Robin Hood table shared by [`crate::map::Map`] and
//! [`crate::numeric_map::NumericMap`].

use crate::dialect::Dialect;
use crate::hash::home_slot;
use crate::hash::probe_limit_for;
use crate::hash::shift_for_capacity;

const MIN_CAPACITY: usize = 16;
const DEFAULT_LOAD_FACTOR: f64 = 0.88;

struct Entry<K, V> {
    key: K,
    value: V,
    hash: u32,
    psl: u8,
}

/// An open-addressed, linearly-probed, Robin Hood hash table with a hard
/// per-lookup probe budget derived from capacity.
///
/// `entries` always has length `capacity + probe_limit`: the extra
/// `probe_limit` tail slots let every probe walk run off the end of the
/// logical table without wraparound arithmetic. Empty slots are `None`
/// rather than a PSL sentinel, since the crate forbids `unsafe_code`.
pub struct RawTable<K, V, D> {
    entries: Vec<Option<Entry<K, V>>>,
    capacity: usize,
    probe_limit: u8,
    shift: u32,
    count: usize,
    load_factor: f64,
    dialect: D,
}

impl<K, V, D> RawTable<K, V, D>
where
    D: Dialect<K>,
{
    /// Creates an empty table. `initial_capacity` is rounded up to a power
    /// of two no smaller than 16; `0` is coerced to the minimum.
    pub fn new(initial_capacity: usize, load_factor: f64, dialect: D) -> Self {
        let capacity = initial_capacity.max(1).next_power_of_two().max(MIN_CAPACITY);
        let probe_limit = probe_limit_for(capacity);
        let shift = shift_for_capacity(capacity);
        let entries = empty_slots(capacity + probe_limit as usize);
        Self {
            entries,
            capacity,
            probe_limit,
            shift,
            count: 0,
            load_factor,
            dialect,
        }
    }

    pub fn with_default_load_factor(initial_capacity: usize, dialect: D) -> Self {
        Self::new(initial_capacity, DEFAULT_LOAD_FACTOR, dialect)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Length of the backing array, including the probe-limit tail.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Inserts `(key, value)`. Returns `false` without modifying the table
    /// if `key` is already present.
    pub fn insert(&mut self, key: K, value: V, hash: u32) -> bool {
        if self.should_grow() {
            self.grow();
        }
        if self.probe_find(&key, hash).is_some() {
            return false;
        }
        self.insert_probe(Entry {
            key,
            value,
            hash,
            psl: 0,
        });
        true
    }

    /// Looks up `key`, returning its value if present.
    pub fn get(&self, key: &K, hash: u32) -> Option<&V> {
        let idx = self.probe_find(key, hash)?;
        self.entries[idx].as_ref().map(|e| &e.value)
    }

    /// Overwrites the value for `key` if present; silent no-op otherwise.
    pub fn update(&mut self, key: &K, value: V, hash: u32) -> bool {
        match self.probe_find(key, hash) {
            Some(idx) => {
                if let Some(entry) = self.entries[idx].as_mut() {
                    entry.value = value;
                }
                true
            }
            None => false,
        }
    }

    /// Removes `key` via backshift deletion; silent no-op if absent.
    /// Never triggers a resize.
    pub fn remove(&mut self, key: &K, hash: u32) -> bool {
        let Some(found) = self.probe_find(key, hash) else {
            return false;
        };
        self.entries[found] = None;
        self.count -= 1;

        let mut hole = found;
        let mut idx = found + 1;
        while idx < self.entries.len() {
            match self.entries[idx].take() {
                None => break,
                Some(mut entry) => {
                    if entry.psl == 0 {
                        self.entries[idx] = Some(entry);
                        break;
                    }
                    entry.psl -= 1;
                    self.entries[hole] = Some(entry);
                    hole = idx;
                }
            }
            idx += 1;
        }
        true
    }

    fn should_grow(&self) -> bool {
        self.count >= self.capacity || (self.count as f64 / self.capacity as f64) > self.load_factor
    }

    /// Scans the probe window for `key`, returning the matching slot index.
    ///
    /// For the numeric dialect, tracks `psl_seen` and stops as soon as a
    /// slot's PSL drops below the previous one: by the Robin Hood invariant,
    /// the key cannot appear later in the window. The generic dialect always
    /// runs the full comparator over the window and only stops on `None`.
    fn probe_find(&self, key: &K, hash: u32) -> Option<usize> {
        let home = home_slot(hash, self.shift);
        let mut psl_seen: Option<u8> = None;
        for offset in 0..self.probe_limit as usize {
            let idx = home + offset;
            let entry = self.entries[idx].as_ref()?;
            if D::PSL_SHORT_CIRCUIT {
                if let Some(seen) = psl_seen {
                    if entry.psl < seen {
                        return None;
                    }
                }
                psl_seen = Some(entry.psl);
            }
            if self.dialect.same_key(&entry.key, entry.hash, key, hash) {
                return Some(idx);
            }
        }
        None
    }

    /// Places `entry` via Robin Hood displacement starting at its home slot.
    /// Grows the table (absorbing `entry`) if the walk exceeds `probe_limit`.
    fn insert_probe(&mut self, entry: Entry<K, V>) {
        match place_one(&mut self.entries, self.probe_limit, self.shift, entry) {
            Ok(()) => self.count += 1,
            Err(overflowed) => self.rebuild(Some(overflowed)),
        }
    }

    /// Doubles capacity and re-homes every live entry, retrying at a further
    /// doubled capacity if the rebuild itself overflows its probe budget.
    /// `extra`, if given, is folded into the entries being re-homed (used
    /// when a resize is triggered mid-walk by an overflowing insert).
    fn grow(&mut self) {
        self.rebuild(None);
    }

    fn rebuild(&mut self, extra: Option<Entry<K, V>>) {
        let mut pending: Vec<Entry<K, V>> = self.entries.drain(..).flatten().collect();
        if let Some(entry) = extra {
            pending.push(entry);
        }
        let mut capacity = (self.capacity * 2).max(MIN_CAPACITY);
        loop {
            let probe_limit = probe_limit_for(capacity);
            let shift = shift_for_capacity(capacity);
            match try_place_all(capacity, probe_limit, shift, pending) {
                Ok(entries) => {
                    self.count = entries.iter().flatten().count();
                    self.entries = entries;
                    self.capacity = capacity;
                    self.probe_limit = probe_limit;
                    self.shift = shift;
                    return;
                }
                Err(recovered) => {
                    pending = recovered;
                    capacity *= 2;
                }
            }
        }
    }
}

fn empty_slots<K, V>(len: usize) -> Vec<Option<Entry<K, V>>> {
    std::iter::repeat_with(|| None).take(len).collect()
}

/// Places a single entry into `entries` via Robin Hood displacement,
/// inheriting the displaced occupant's own PSL on every swap rather than
/// recomputing it from loop position — the two differ once more than one
/// swap has occurred, since different entries can have different homes.
///
/// Returns the entry back (unplaced) if the walk would need `probe_limit`
/// slots or more, so the caller can resize and retry.
fn place_one<K, V>(
    entries: &mut [Option<Entry<K, V>>],
    probe_limit: u8,
    shift: u32,
    entry: Entry<K, V>,
) -> Result<(), Entry<K, V>> {
    let home = home_slot(entry.hash, shift);
    let mut idx = home;
    let mut psl: u8 = 0;
    let mut current = entry;
    loop {
        if psl == probe_limit {
            return Err(current);
        }
        match entries[idx].take() {
            None => {
                current.psl = psl;
                entries[idx] = Some(current);
                return Ok(());
            }
            Some(occupant) => {
                if psl > occupant.psl {
                    let displaced_psl = occupant.psl;
                    current.psl = psl;
                    entries[idx] = Some(current);
                    current = occupant;
                    psl = displaced_psl;
                } else {
                    entries[idx] = Some(occupant);
                }
            }
        }
        idx += 1;
        psl += 1;
    }
}

/// Rebuilds a fresh array of the given shape from `pending`, skipping the
/// key-exists pre-check (the source table's invariants already guarantee
/// uniqueness). On overflow, recovers every already-placed entry plus the
/// overflowing one plus everything not yet attempted, so no entry is ever
/// lost across a retry at a larger capacity.
fn try_place_all<K, V>(
    capacity: usize,
    probe_limit: u8,
    shift: u32,
    pending: Vec<Entry<K, V>>,
) -> Result<Vec<Option<Entry<K, V>>>, Vec<Entry<K, V>>> {
    let mut entries = empty_slots(capacity + probe_limit as usize);
    let mut iter = pending.into_iter();
    for entry in &mut iter {
        if let Err(overflowed) = place_one(&mut entries, probe_limit, shift, entry) {
            let mut recovered: Vec<Entry<K, V>> = entries.into_iter().flatten().collect();
            recovered.push(overflowed);
            recovered.extend(iter);
            return Err(recovered);
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Generic;
    use crate::dialect::Numeric;
    use crate::hash::hash_key;

    fn generic_table() -> RawTable<i32, &'static str, Generic<i32, fn(&i32, &i32) -> bool>> {
        RawTable::with_default_load_factor(16, Generic::new(|a: &i32, b: &i32| a == b))
    }

    #[test]
    fn insert_then_lookup_same_key_returns_inserted_value() {
        let mut table = generic_table();
        assert!(table.insert(1, "a", hash_key(&1)));
        assert_eq!(table.get(&1, hash_key(&1)), Some(&"a"));
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut table = generic_table();
        assert!(table.insert(1, "a", hash_key(&1)));
        assert!(!table.insert(1, "b", hash_key(&1)));
        assert_eq!(table.get(&1, hash_key(&1)), Some(&"a"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn lookup_of_absent_key_is_none() {
        let table = generic_table();
        assert_eq!(table.get(&42, hash_key(&42)), None);
    }

    #[test]
    fn update_overwrites_existing_value_only() {
        let mut table = generic_table();
        table.insert(5, "x", hash_key(&5));
        assert!(table.update(&5, "y", hash_key(&5)));
        assert_eq!(table.get(&5, hash_key(&5)), Some(&"y"));

        assert!(!table.update(&99, "z", hash_key(&99)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn remove_then_lookup_is_absent_and_siblings_survive() {
        let mut table = generic_table();
        for k in 1..=20 {
            table.insert(k, k * 2, hash_key(&k));
        }
        for k in (2..=20).step_by(2) {
            assert!(table.remove(&k, hash_key(&k)));
        }
        for k in (1..=20).step_by(2) {
            assert_eq!(table.get(&k, hash_key(&k)), Some(&(k * 2)));
        }
        for k in (2..=20).step_by(2) {
            assert_eq!(table.get(&k, hash_key(&k)), None);
        }
        assert_eq!(table.len(), 10);
    }

    #[test]
    fn remove_of_absent_key_is_a_silent_no_op() {
        let mut table = generic_table();
        table.insert(1, "a", hash_key(&1));
        assert!(!table.remove(&2, hash_key(&2)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn insert_remove_of_never_present_key_is_idempotent() {
        let mut table = generic_table();
        table.insert(1, "a", hash_key(&1));
        let before = table.get(&1, hash_key(&1)).copied();
        table.insert(2, "b", hash_key(&2));
        table.remove(&2, hash_key(&2));
        assert_eq!(table.get(&1, hash_key(&1)).copied(), before);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn resize_preserves_every_key_value_pair() {
        let mut table = generic_table();
        for k in 0..1000 {
            table.insert(k, k * 2, hash_key(&k));
        }
        for k in 0..1000 {
            assert_eq!(table.get(&k, hash_key(&k)), Some(&(k * 2)));
        }
        assert_eq!(table.len(), 1000);
    }

    #[test]
    fn capacity_sixteen_resizes_before_the_sixteenth_insert_settles() {
        let mut table: RawTable<i32, i32, Generic<i32, fn(&i32, &i32) -> bool>> =
            RawTable::new(16, 0.88, Generic::new(|a, b| a == b));
        for k in 0..15 {
            table.insert(k, k, hash_key(&k));
        }
        // 15/16 = 0.9375 > 0.88, so the load-factor trigger must already
        // have fired by the time all 15 keys are in.
        assert!(table.capacity() >= 32 + probe_limit_for(32) as usize);
        for k in 0..15 {
            assert_eq!(table.get(&k, hash_key(&k)), Some(&k));
        }
    }

    #[test]
    fn initial_capacity_zero_is_coerced_to_sixteen() {
        let table: RawTable<i32, i32, Generic<i32, fn(&i32, &i32) -> bool>> =
            RawTable::new(0, 0.88, Generic::new(|a, b| a == b));
        assert_eq!(table.capacity(), MIN_CAPACITY + probe_limit_for(MIN_CAPACITY) as usize);
    }

    #[test]
    fn every_occupied_slot_satisfies_the_psl_invariant() {
        let mut table = generic_table();
        for k in 0..500 {
            table.insert(k, k, hash_key(&k));
        }
        for (idx, slot) in table.entries.iter().enumerate() {
            if let Some(entry) = slot {
                let home = home_slot(entry.hash, table.shift);
                assert_eq!(entry.psl as usize, idx - home);
            }
        }
    }

    #[test]
    fn numeric_dialect_survives_clustered_hashes() {
        let mut table: RawTable<u32, u32, Numeric<u32>> =
            RawTable::with_default_load_factor(16, Numeric::new());
        // `reverse_bits` is a bijection, so distinct keys still get distinct
        // hashes (the numeric dialect's injectivity precondition holds),
        // but every key below 2^14 maps to a hash that is a multiple of
        // 2^18 — the "all multiples of a large power of two" pathological
        // pattern, which collapses the effective entropy Fibonacci hashing
        // can draw on until enough resizes have widened the home mapping.
        for k in 0..10_000u32 {
            let clustered_hash = k.reverse_bits();
            assert!(table.insert(k, k, clustered_hash));
        }
        for k in 0..10_000u32 {
            assert_eq!(table.get(&k, k.reverse_bits()), Some(&k));
        }
        assert_eq!(table.len(), 10_000);
    }
}
