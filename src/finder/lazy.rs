////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

use byteorder::{ByteOrder, LittleEndian};

use crate::extend::{extend, extend2};
use crate::hash;
use crate::matches::push_match;
use crate::{Match, MatchFinder};

const LAZY_TABLE_BITS: usize = 16;
const LAZY_TABLE_SIZE: usize = 1 << LAZY_TABLE_BITS;
const LAZY_SHIFT: u32 = 32 - LAZY_TABLE_BITS as u32;
const LAZY_TABLE_MASK: usize = LAZY_TABLE_SIZE - 1;

fn lazy_hash(u: u32) -> u32 {
    u.wrapping_mul(hash::MUL32) >> LAZY_SHIFT
}

fn hash8(u: u64) -> u32 {
    (u.wrapping_mul(hash::MUL64_LONG) >> (LAZY_SHIFT + 32)) as u32
}

/// `LazyMatchFinder` does lazy matching: when it finds a match it also
/// probes the next byte with an 8-byte hash, and defers to that match if
/// it is strictly better. Both hash widths share one table.
pub struct LazyMatchFinder {
    /// The maximum distance (in bytes) to look back for a match.
    pub max_distance: usize,

    /// The longest match to emit as a single record; longer matches are
    /// split. 0 means unlimited.
    pub max_length: usize,

    /// Should matches reach back into the previous block?
    pub chain_blocks: bool,

    table: Box<[u32; LAZY_TABLE_SIZE]>,
    prev_block: Vec<u8>,
}

impl LazyMatchFinder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_distance: 65535,
            max_length: 65535,
            chain_blocks: false,
            table: vec![0; LAZY_TABLE_SIZE]
                .into_boxed_slice()
                .try_into()
                .unwrap(),
            prev_block: Vec::new(),
        }
    }

    fn finish(&mut self, dst: &mut Vec<Match>, src: &[u8], next_emit: usize) {
        if next_emit < src.len() {
            dst.push(Match::literal(src.len() - next_emit));
        }
        if self.chain_blocks {
            self.prev_block.clear();
            self.prev_block.extend_from_slice(src);
        }
    }

    /// Checks the table at `idx` for a usable candidate for the 8 bytes at
    /// `pos`, storing `pos` in its place. Returns the candidate (negative
    /// when it lies in the previous block) and the extended match end, or
    /// `None`.
    fn probe8(&mut self, src: &[u8], pos: usize, idx: usize) -> Option<(isize, usize)> {
        let candidate = self.table[idx] as usize;
        self.table[idx] = pos as u32;
        if candidate == 0 {
            return None;
        }
        if candidate < pos {
            if pos - candidate <= self.max_distance
                && LittleEndian::read_u64(&src[pos..]) == LittleEndian::read_u64(&src[candidate..])
            {
                let end = extend(src, candidate + 8, pos + 8);
                return Some((candidate as isize, end));
            }
        } else if self.chain_blocks && candidate + 7 < self.prev_block.len() {
            if pos + self.prev_block.len() - candidate <= self.max_distance
                && LittleEndian::read_u64(&src[pos..])
                    == LittleEndian::read_u64(&self.prev_block[candidate..])
            {
                let end = extend2(&self.prev_block, candidate + 8, src, pos + 8);
                return Some((candidate as isize - self.prev_block.len() as isize, end));
            }
        }
        None
    }
}

impl Default for LazyMatchFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder for LazyMatchFinder {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        // The margin leaves room for the 64-bit loads used for hashing.
        if src.len() < 9 {
            self.finish(dst, src, 0);
            return;
        }

        // s_limit is when to stop looking for offset/length copies.
        let s_limit = src.len() - 8;

        // next_emit is where in src the next literal run starts from.
        let mut next_emit = 0;

        // The encoded form must start with a literal, so hash matching
        // starts at s == 1.
        let mut s = 1;

        'outer: while s <= s_limit {
            // Heuristic match skipping, as in the snappy scan loop: the
            // stride grows by one for every 32 bytes scanned without a
            // match.
            let mut skip = 32_usize;

            let mut next_s = s;
            let mut candidate: isize;
            loop {
                s = next_s;
                let next_hash = lazy_hash(LittleEndian::read_u32(&src[s..]));
                let bytes_between_hash_lookups = skip >> 5;
                next_s = s + bytes_between_hash_lookups;
                skip += bytes_between_hash_lookups;
                if next_s > s_limit {
                    break 'outer;
                }
                candidate = self.table[next_hash as usize & LAZY_TABLE_MASK] as isize;
                self.table[next_hash as usize & LAZY_TABLE_MASK] = s as u32;
                if candidate == 0 {
                    continue;
                }
                let c = candidate as usize;
                if c < s {
                    if s - c <= self.max_distance
                        && LittleEndian::read_u32(&src[s..]) == LittleEndian::read_u32(&src[c..])
                    {
                        break;
                    }
                } else if self.chain_blocks && c + 3 < self.prev_block.len() {
                    if s + self.prev_block.len() - c <= self.max_distance
                        && LittleEndian::read_u32(&src[s..])
                            == LittleEndian::read_u32(&self.prev_block[c..])
                    {
                        break;
                    }
                }
            }

            // A 4-byte match has been found; prior to it, src[next_emit..s]
            // are unmatched.
            let mut base = s;

            if (candidate as usize) < s {
                s = extend(src, candidate as usize + 4, s + 4);
            } else {
                s = extend2(&self.prev_block, candidate as usize + 4, src, s + 4);
                candidate -= self.prev_block.len() as isize;
            }

            // See if we can find a longer match using an 8-byte hash.
            let h = hash8(LittleEndian::read_u64(&src[base..]));
            if let Some((c8, end)) = self.probe8(src, base, h as usize & LAZY_TABLE_MASK) {
                if end > s {
                    s = end;
                    candidate = c8;
                }
            }

            let orig_base = base;

            // Now try lazy matching: a better match starting one byte
            // later wins over the current one.
            if base + 1 < s_limit {
                let i = base + 1;
                let h = hash8(LittleEndian::read_u64(&src[i..]));
                if let Some((lazy_candidate, end)) =
                    self.probe8(src, i, h as usize & LAZY_TABLE_MASK)
                {
                    if end - i > s - base {
                        base = i;
                        s = end;
                        candidate = lazy_candidate;
                    }
                }
            }

            push_match(
                dst,
                base - next_emit,
                s - base,
                (base as isize - candidate) as usize,
                self.max_length,
            );
            next_emit = s;
            if s >= s_limit {
                break 'outer;
            }

            // We could immediately start working at s now, but to improve
            // compression we first update the hash table for the positions
            // inside the match.
            for i in orig_base..s {
                let x = LittleEndian::read_u32(&src[i..]);
                let h = lazy_hash(x);
                self.table[h as usize & LAZY_TABLE_MASK] = i as u32;
            }
        }

        self.finish(dst, src, next_emit);
    }

    fn reset(&mut self) {
        self.table.fill(0);
        self.prev_block.clear();
    }
}
