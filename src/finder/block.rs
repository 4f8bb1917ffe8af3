////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! No-history block finders in the style of the two fastest brotli
//! compression levels. Every block stands alone: the table is cleared on
//! each call and matches never cross block boundaries, which caps blocks
//! at 64 KiB so positions fit in 16 bits.

use byteorder::{ByteOrder, LittleEndian};

use crate::hash;
use crate::matches::push_match;
use crate::{Match, MatchFinder, extend::extend};

/// The hard per-block limit of the no-history finders.
pub const MAX_BLOCK_SIZE: usize = 65536;

const INPUT_MARGIN: usize = 16 - 1;
const MIN_NON_LITERAL_BLOCK_SIZE: usize = 1 + 1 + INPUT_MARGIN;

const M0_HASH_LEN: u32 = 5;
const M0_TABLE_BITS: u32 = 14;
const M0_TABLE_SIZE: usize = 1 << M0_TABLE_BITS;
// The mask is redundant, but helps the compiler eliminate bounds checks.
const M0_TABLE_MASK: usize = M0_TABLE_SIZE - 1;

fn m0_hash(data: u64) -> u64 {
    let h = (data << (64 - 8 * M0_HASH_LEN)).wrapping_mul(hash::MUL64);
    h >> (64 - M0_TABLE_BITS)
}

/// `M0` is the fastest match finder: one probe per position with an
/// optional one-byte lazy look-ahead.
pub struct M0 {
    /// Turns on lazy matching, for higher compression but less speed.
    pub lazy: bool,

    /// The maximum distance (in bytes) to look back for a match.
    /// 0 means unlimited.
    pub max_distance: usize,

    /// The longest match to emit as a single record; longer matches are
    /// split. 0 means unlimited.
    pub max_length: usize,

    table: Vec<u16>,
}

impl M0 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lazy: false,
            max_distance: 0,
            max_length: 0,
            table: Vec::new(),
        }
    }

    fn distance_ok_for(max_distance: usize, distance: usize) -> bool {
        max_distance == 0 || distance <= max_distance
    }
}

impl Default for M0 {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder for M0 {
    /// Looks for matches in `src`, appends them to `dst`.
    ///
    /// # Panics
    /// Panics if `src` is longer than 64 KiB; feed such blocks through
    /// [`Writer`](crate::Writer) with a smaller block size instead.
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        if src.len() < MIN_NON_LITERAL_BLOCK_SIZE {
            if !src.is_empty() {
                dst.push(Match::literal(src.len()));
            }
            return;
        }
        assert!(
            src.len() <= MAX_BLOCK_SIZE,
            "block of {} bytes exceeds the {} byte limit",
            src.len(),
            MAX_BLOCK_SIZE
        );

        if self.table.len() < M0_TABLE_SIZE {
            self.table = vec![0; M0_TABLE_SIZE];
        } else {
            self.table.fill(0);
        }
        let table = &mut self.table;

        // s_limit is when to stop looking for offset/length copies.
        let s_limit = src.len() - INPUT_MARGIN;

        // next_emit is where in src the next literal run starts from.
        let mut next_emit = 0;

        // The encoded form must start with a literal, as there are no
        // previous bytes to copy, so we start looking for hash matches at
        // s == 1.
        let mut s = 1;
        let mut next_hash = m0_hash(LittleEndian::read_u64(&src[s..]));

        'outer: loop {
            // Heuristic match skipping, as in the snappy scan loop.
            let mut skip = 32_usize;

            let mut next_s = s;
            let mut candidate: usize;
            loop {
                s = next_s;
                let bytes_between_hash_lookups = skip >> 5;
                next_s = s + bytes_between_hash_lookups;
                skip += bytes_between_hash_lookups;
                if next_s > s_limit {
                    break 'outer;
                }
                candidate = table[next_hash as usize & M0_TABLE_MASK] as usize;
                table[next_hash as usize & M0_TABLE_MASK] = s as u16;
                next_hash = m0_hash(LittleEndian::read_u64(&src[next_s..]));
                if Self::distance_ok_for(self.max_distance, s - candidate)
                    && LittleEndian::read_u32(&src[s..]) == LittleEndian::read_u32(&src[candidate..])
                {
                    break;
                }
            }

            // Invariant: we have a 4-byte match at s.
            let mut base = s;
            s = extend(src, candidate + 4, s + 4);

            let orig_base = base;
            if self.lazy && base + 1 < s_limit {
                let new_base = base + 1;
                let h = m0_hash(LittleEndian::read_u64(&src[new_base..]));
                let new_candidate = table[h as usize & M0_TABLE_MASK] as usize;
                table[h as usize & M0_TABLE_MASK] = new_base as u16;
                if Self::distance_ok_for(self.max_distance, new_base - new_candidate)
                    && LittleEndian::read_u32(&src[new_base..])
                        == LittleEndian::read_u32(&src[new_candidate..])
                {
                    let new_s = extend(src, new_candidate + 4, new_base + 4);
                    if new_s - new_base > s - base + 1 {
                        s = new_s;
                        base = new_base;
                        candidate = new_candidate;
                    }
                }
            }

            push_match(dst, base - next_emit, s - base, base - candidate, self.max_length);
            next_emit = s;
            if s >= s_limit {
                break 'outer;
            }

            if self.lazy {
                // If lazy matching is enabled, we update the hash table for
                // every byte in the match.
                for i in orig_base + 2..s.saturating_sub(1) {
                    let x = LittleEndian::read_u64(&src[i..]);
                    table[m0_hash(x) as usize & M0_TABLE_MASK] = i as u16;
                }
            }

            // We could immediately start working at s now, but to improve
            // compression we first update the hash table at s-1 and at s.
            let x = LittleEndian::read_u64(&src[s - 1..]);
            let prev_hash = m0_hash(x);
            table[prev_hash as usize & M0_TABLE_MASK] = (s - 1) as u16;
            next_hash = m0_hash(x >> 8);
        }

        if next_emit < src.len() {
            dst.push(Match::literal(src.len() - next_emit));
        }
    }

    fn reset(&mut self) {
        self.table.clear();
    }

    fn max_block_size(&self) -> Option<usize> {
        Some(MAX_BLOCK_SIZE)
    }
}

const M1_HASH_LEN: u32 = 6;
const M1_TABLE_BITS: u32 = 17;
const M1_TABLE_SIZE: usize = 1 << M1_TABLE_BITS;
// The mask is redundant, but helps the compiler eliminate bounds checks.
const M1_TABLE_MASK: usize = M1_TABLE_SIZE - 1;

fn m1_hash(data: u64) -> u64 {
    let h = (data << (64 - 8 * M1_HASH_LEN)).wrapping_mul(hash::MUL64);
    h >> (64 - M1_TABLE_BITS)
}

/// `M1` trades a little of [M0]'s speed for ratio: a larger table, a
/// 6-byte hash, and denser table updates inside emitted matches.
pub struct M1 {
    table: Vec<u16>,
}

impl M1 {
    #[must_use]
    pub fn new() -> Self {
        Self { table: Vec::new() }
    }
}

impl Default for M1 {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder for M1 {
    /// Looks for matches in `src`, appends them to `dst`.
    ///
    /// # Panics
    /// Panics if `src` is longer than 64 KiB; feed such blocks through
    /// [`Writer`](crate::Writer) with a smaller block size instead.
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        if src.len() < MIN_NON_LITERAL_BLOCK_SIZE {
            if !src.is_empty() {
                dst.push(Match::literal(src.len()));
            }
            return;
        }
        assert!(
            src.len() <= MAX_BLOCK_SIZE,
            "block of {} bytes exceeds the {} byte limit",
            src.len(),
            MAX_BLOCK_SIZE
        );

        if self.table.len() < M1_TABLE_SIZE {
            self.table = vec![0; M1_TABLE_SIZE];
        } else {
            self.table.fill(0);
        }
        let table = &mut self.table;

        let s_limit = src.len() - INPUT_MARGIN;
        let mut next_emit = 0;
        let mut s = 1;
        let mut next_hash = m1_hash(LittleEndian::read_u64(&src[s..]));

        'outer: loop {
            let mut skip = 32_usize;

            let mut next_s = s;
            let mut candidate: usize;
            loop {
                s = next_s;
                let bytes_between_hash_lookups = skip >> 5;
                next_s = s + bytes_between_hash_lookups;
                skip += bytes_between_hash_lookups;
                if next_s > s_limit {
                    break 'outer;
                }
                candidate = table[next_hash as usize & M1_TABLE_MASK] as usize;
                table[next_hash as usize & M1_TABLE_MASK] = s as u16;
                next_hash = m1_hash(LittleEndian::read_u64(&src[next_s..]));
                if LittleEndian::read_u32(&src[s..]) == LittleEndian::read_u32(&src[candidate..]) {
                    break;
                }
            }

            // Invariant: we have a 4-byte match at s.
            let base = s;
            s = extend(src, candidate + 4, s + 4);

            dst.push(Match::new(base - next_emit, s - base, base - candidate));
            next_emit = s;
            if s >= s_limit {
                break 'outer;
            }

            // We could immediately start working at s now, but to improve
            // compression we first update the hash table within the last
            // copy.
            for i in base + 1..s.saturating_sub(5) {
                let x = LittleEndian::read_u64(&src[i..]);
                table[m1_hash(x) as usize & M1_TABLE_MASK] = i as u16;
            }
            let x = LittleEndian::read_u64(&src[s - 5..]);
            table[m1_hash(x) as usize & M1_TABLE_MASK] = (s - 5) as u16;
            table[m1_hash(x >> 8) as usize & M1_TABLE_MASK] = (s - 4) as u16;
            table[m1_hash(x >> 16) as usize & M1_TABLE_MASK] = (s - 3) as u16;
            let x = LittleEndian::read_u64(&src[s - 2..]);
            table[m1_hash(x) as usize & M1_TABLE_MASK] = (s - 2) as u16;
            table[m1_hash(x >> 8) as usize & M1_TABLE_MASK] = (s - 1) as u16;
            next_hash = m1_hash(x >> 16);
        }

        if next_emit < src.len() {
            dst.push(Match::literal(src.len() - next_emit));
        }
    }

    fn reset(&mut self) {
        self.table.clear();
    }

    fn max_block_size(&self) -> Option<usize> {
        Some(MAX_BLOCK_SIZE)
    }
}
