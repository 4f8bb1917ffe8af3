////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! Multi-candidate hash tables in the style of the brotli reference
//! implementation, consumed by
//! [`ScoredMatchFinder`](crate::finder::ScoredMatchFinder).

mod bucket;
mod single;
mod sweep;

pub use bucket::{H5, H6};
pub use single::H2;
pub use sweep::{H3, H4, SweepHasher};

/// A `Hasher` maintains a hash table for finding backreferences in data.
pub trait Hasher {
    /// Allocates the hasher's internal storage, or clears it if it is
    /// already allocated. Must be called before any of the other methods.
    fn init(&mut self);

    /// Puts an entry in the hash table for the data at `index`. The caller
    /// must guarantee `index + 8 <= data.len()`.
    fn store(&mut self, data: &[u8], index: usize);

    /// Hashes the data at `index`, appends the possible matches from the
    /// hash table to `dst`, and then stores `index` as a side effect.
    /// Multi-slot hashers list candidates newest first.
    fn candidates(&mut self, dst: &mut Vec<usize>, data: &[u8], index: usize);
}

/// A `CompositeHasher` wraps two hashers and combines their output:
/// stores fan out to both, and candidate lists are concatenated.
pub struct CompositeHasher<A, B> {
    pub a: A,
    pub b: B,
}

impl<A: Hasher, B: Hasher> CompositeHasher<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Hasher, B: Hasher> Hasher for CompositeHasher<A, B> {
    fn init(&mut self) {
        self.a.init();
        self.b.init();
    }

    fn store(&mut self, data: &[u8], index: usize) {
        self.a.store(data, index);
        self.b.store(data, index);
    }

    fn candidates(&mut self, dst: &mut Vec<usize>, data: &[u8], index: usize) {
        self.a.candidates(dst, data, index);
        self.b.candidates(dst, data, index);
    }
}
