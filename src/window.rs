////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! The sliding history buffer shared by the history-aware match finders.
//!
//! Positions handed to the index structures are absolute offsets into this
//! buffer. They stay valid until the buffer is rebased: when the length
//! exceeds `max_history`, the oldest bytes are dropped so that
//! `min_history` bytes remain, and every index structure bound to the
//! window must shift its stored offsets by the same amount (clamping at
//! the 0 sentinel, see [`rebase_positions`]).

/// Default amount of history kept after a rebase.
pub(crate) const MIN_HISTORY: usize = 1 << 16;

/// Default history length that triggers a rebase.
pub(crate) const MAX_HISTORY: usize = 1 << 18;

pub(crate) struct Window {
    buf: Vec<u8>,
    min_history: usize,
    max_history: usize,
}

impl Window {
    pub fn new(min_history: usize, max_history: usize) -> Self {
        debug_assert!(min_history <= max_history);
        Self {
            buf: Vec::new(),
            min_history,
            max_history,
        }
    }

    /// Appends a block, rebasing first if the buffer has outgrown
    /// `max_history`. Returns the offset where the block starts and the
    /// number of bytes dropped from the front (0 when no rebase happened).
    /// The caller must remap its index structures by the returned delta.
    pub fn append(&mut self, src: &[u8]) -> (usize, usize) {
        let mut delta = 0;
        if self.buf.len() > self.max_history {
            delta = self.buf.len() - self.min_history;
            self.buf.drain(..delta);
        }
        let start = self.buf.len();
        self.buf.extend_from_slice(src);
        (start, delta)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn reset(&mut self) {
        self.buf.clear();
    }
}

/// Shifts every stored position down by `delta`, clamping at 0. A slot
/// that would go negative no longer points at retained history, and 0 is
/// the "no candidate" sentinel.
pub(crate) fn rebase_positions(table: &mut [u32], delta: usize) {
    let delta = delta as u32;
    for v in table.iter_mut() {
        *v = v.saturating_sub(delta);
    }
}
