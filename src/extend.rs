////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! Match extension primitives. All functions here are pure over immutable
//! byte views; they compare 8 bytes at a time and use the trailing-zero
//! count of the XOR to locate the first differing byte, falling back to a
//! byte loop near the end of the buffer.

use byteorder::{ByteOrder, LittleEndian};

/// Returns the largest `k` such that `k <= buf.len()` and `buf[i..i+k-j]`
/// and `buf[j..k]` have the same contents.
///
/// Assumes `i < j && j <= buf.len()`.
#[must_use]
pub fn extend(buf: &[u8], mut i: usize, mut j: usize) -> usize {
    while j + 8 < buf.len() {
        let a = LittleEndian::read_u64(&buf[i..]);
        let b = LittleEndian::read_u64(&buf[j..]);
        if a != b {
            // The trailing-zero count of the XOR finds the lowest differing
            // bit; little-endian order makes `>> 3` the byte offset.
            return j + ((a ^ b).trailing_zeros() >> 3) as usize;
        }
        i += 8;
        j += 8;
    }
    while j < buf.len() && buf[i] == buf[j] {
        i += 1;
        j += 1;
    }
    j
}

/// Returns the largest `k` such that `a[i..i+k-j]` and `b[j..k]` have the
/// same contents (and all these indexes are valid). Used to extend a match
/// whose source lies in a previous block's buffer.
#[must_use]
pub fn extend2(a: &[u8], mut i: usize, b: &[u8], mut j: usize) -> usize {
    while i + 8 < a.len() && j + 8 < b.len() {
        let x = LittleEndian::read_u64(&a[i..]);
        let y = LittleEndian::read_u64(&b[j..]);
        if x != y {
            return j + ((x ^ y).trailing_zeros() >> 3) as usize;
        }
        i += 8;
        j += 8;
    }
    while i < a.len() && j < b.len() && a[i] == b[j] {
        i += 1;
        j += 1;
    }
    j
}

/// Extends a match backward: decrements `start` and `match_pos` in
/// lockstep while the preceding bytes agree, without crossing `min` or the
/// start of the buffer. Returns the adjusted `(start, match_pos)`.
#[must_use]
pub fn extend_backward(
    buf: &[u8],
    mut start: usize,
    mut match_pos: usize,
    min: usize,
) -> (usize, usize) {
    while start > min && match_pos > 0 && buf[start - 1] == buf[match_pos - 1] {
        start -= 1;
        match_pos -= 1;
    }
    (start, match_pos)
}
