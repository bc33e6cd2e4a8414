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

//! A bounded-probe Robin Hood hash table.
//!
//! The table is an open-addressed, linearly-probed, Robin Hood variant with
//! a hard per-lookup probe budget derived from capacity (`⌊log2(capacity)⌋`,
//! capped at 15). Every lookup, update, remove, and indexed-read operation
//! costs at most `probe_limit` comparisons; a resize is the sole escape
//! valve for pathological key clustering.
//!
//! Two dialects share the same probe protocol:
//!
//! - [`Map`] — a general-purpose map; equality is decided by a comparator
//!   (`PartialEq` by default).
//! - [`NumericMap`] — keys restricted to `u32`/`i32`; equality is decided
//!   by comparing stored hashes directly, skipping key comparison entirely.
//!
//! # Usage
//!
//! ```rust
//! # use robinhash::Map;
//! let mut map = Map::new();
//! map.insert(1, "a");
//! map.insert(2, "b");
//! assert_eq!(map.get(&2), Some(&"b"));
//! assert_eq!(map.get(&4), None);
//! ```
//!
//! ```rust
//! # use robinhash::NumericMap;
//! let mut map: NumericMap<u32, &str> = NumericMap::new();
//! map.insert(7, "seven");
//! assert_eq!(map.get(&7), Some(&"seven"));
//! ```
//!
//! # Non-goals
//!
//! No concurrent access, no iteration/enumeration of live entries, no
//! persistence, no ordered traversal, no stable references across
//! mutations, no tombstone deletion, no shrink-on-removal, and no
//! randomized seeding against adversarial key distributions. The container
//! exposes only single-key point operations.

mod dialect;
mod hash;
mod table;

pub mod error;
pub mod map;
pub mod numeric_map;

pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::map::Map;
pub use crate::map::MapBuilder;
pub use crate::numeric_map::NumericKey;
pub use crate::numeric_map::NumericMap;
pub use crate::numeric_map::NumericMapBuilder;
