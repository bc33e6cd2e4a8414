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

//! Error type shared by the generic and numeric map facades.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes surfaced by a table.
///
/// Duplicate-key on insert and absence on `get`/`update`/`remove` are not
/// errors; they are ordinary `bool`/`Option`/silent-no-op return values and
/// never constructed as an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Indexed read (`index_get`) found no entry for the given key.
    KeyNotFound,

    /// A probe walk exceeded its window without the resize trigger catching
    /// it first. This indicates a bug in the table itself, not caller error.
    InvariantViolation(String),

    /// Growing the backing array failed to allocate.
    AllocationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
            Error::AllocationFailed(msg) => write!(f, "allocation failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
