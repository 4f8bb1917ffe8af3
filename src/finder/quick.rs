////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

use byteorder::{ByteOrder, LittleEndian};

use crate::extend::{extend, extend2};
use crate::matches::push_match;
use crate::search::{TABLE_MASK, TABLE_SIZE, hash4};
use crate::{Match, MatchFinder};

const INPUT_MARGIN: usize = 16 - 1;

/// `QuickMatchFinder` is a speed-first match finder in the style of
/// snappy: a single 4-byte hash table, aggressive skipping over
/// incompressible stretches, and an inner loop that chases runs of
/// consecutive copies.
pub struct QuickMatchFinder {
    /// The maximum distance (in bytes) to look back for a match.
    pub max_distance: usize,

    /// The longest match to emit as a single record; longer matches are
    /// split. 0 means unlimited.
    pub max_length: usize,

    /// Should matches reach back into the previous block?
    pub chain_blocks: bool,

    table: Box<[u32; TABLE_SIZE]>,
    prev_block: Vec<u8>,
}

impl QuickMatchFinder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_distance: 65535,
            max_length: 65535,
            chain_blocks: false,
            table: Box::new([0; TABLE_SIZE]),
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
}

impl Default for QuickMatchFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder for QuickMatchFinder {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        // The input margin leaves room for the unchecked loads in the main
        // loop. Blocks shorter than that are emitted as literals.
        if src.len() < INPUT_MARGIN + 1 {
            self.finish(dst, src, 0);
            return;
        }

        // s_limit is when to stop looking for offset/length copies.
        let s_limit = src.len() - INPUT_MARGIN;

        // next_emit is where in src the next literal run starts from.
        let mut next_emit = 0;

        // The encoded form must start with a literal, as there are no
        // previous bytes to copy, so we start looking for hash matches at
        // s == 1.
        let mut s = 1;
        let mut next_hash = hash4(LittleEndian::read_u32(&src[s..]));

        'outer: loop {
            // Heuristic match skipping: if 32 bytes are scanned with no
            // matches found, start looking only at every other byte; after
            // 32 more, every third byte, and so on. When a match is found,
            // go back to looking at every byte. For incompressible input
            // the scan quickly stops examining most positions.
            //
            // The skip variable counts the bytes scanned since the last
            // match; skip >> 5 is the current stride.
            let mut skip = 32_usize;

            let mut next_s = s;
            let mut candidate: isize;
            loop {
                s = next_s;
                let bytes_between_hash_lookups = skip >> 5;
                next_s = s + bytes_between_hash_lookups;
                skip += bytes_between_hash_lookups;
                if next_s > s_limit {
                    break 'outer;
                }
                candidate = self.table[next_hash as usize & TABLE_MASK] as isize;
                self.table[next_hash as usize & TABLE_MASK] = s as u32;
                next_hash = hash4(LittleEndian::read_u32(&src[next_s..]));
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

            // A 4-byte match has been found. Emit the copy, then keep
            // checking whether another copy immediately follows the
            // previous one, which is common in repetitive data.
            loop {
                // Invariant: we have a 4-byte match at s.
                let base = s;

                if (candidate as usize) < s {
                    s = extend(src, candidate as usize + 4, s + 4);
                } else {
                    s = extend2(&self.prev_block, candidate as usize + 4, src, s + 4);
                    candidate -= self.prev_block.len() as isize;
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

                // We could immediately start working at s now, but to
                // improve compression we first update the hash table at
                // s-1 and at s. One 64-bit load serves all three hash
                // calculations.
                let x = LittleEndian::read_u64(&src[s - 1..]);
                let prev_hash = hash4(x as u32);
                self.table[prev_hash as usize & TABLE_MASK] = (s - 1) as u32;
                let curr_hash = hash4((x >> 8) as u32);
                candidate = self.table[curr_hash as usize & TABLE_MASK] as isize;
                self.table[curr_hash as usize & TABLE_MASK] = s as u32;

                let c = candidate as usize;
                if candidate != 0 {
                    if c < s {
                        if s - c <= self.max_distance
                            && (x >> 8) as u32 == LittleEndian::read_u32(&src[c..])
                        {
                            continue;
                        }
                    } else if self.chain_blocks && c + 3 < self.prev_block.len() {
                        if s + self.prev_block.len() - c <= self.max_distance
                            && (x >> 8) as u32 == LittleEndian::read_u32(&self.prev_block[c..])
                        {
                            continue;
                        }
                    }
                }
                next_hash = hash4((x >> 16) as u32);
                s += 1;
                break;
            }
        }

        self.finish(dst, src, next_emit);
    }

    fn reset(&mut self) {
        self.table.fill(0);
        self.prev_block.clear();
    }
}
