////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

use byteorder::{ByteOrder, LittleEndian};

use crate::extend::{extend, extend_backward};
use crate::hash;
use crate::parse::{GreedyParser, Parser, Searcher};
use crate::search::{TABLE_MASK, TABLE_SIZE, hash4};
use crate::window::{MAX_HISTORY, MIN_HISTORY, Window, rebase_positions};
use crate::{AbsoluteMatch, Match, MatchFinder};

const TABLE8_BITS: usize = 17;
const TABLE8_SIZE: usize = 1 << TABLE8_BITS;
const TABLE8_MASK: usize = TABLE8_SIZE - 1;
const TABLE8_SHIFT: u32 = 64 - TABLE8_BITS as u32;

fn hash8(u: u64) -> u32 {
    (u.wrapping_mul(hash::MUL64_LONG) >> TABLE8_SHIFT) as u32
}

/// `DualHash` is a match finder that uses two hash tables (4-byte and
/// 8-byte) to find matches. The 8-byte table catches long matches that
/// collisions have evicted from the 4-byte table.
pub struct DualHash<P = GreedyParser> {
    /// The maximum distance (in bytes) to look back for a match.
    pub max_distance: usize,

    parser: P,
    table4: Box<[u32; TABLE_SIZE]>,
    table8: Box<[u32; TABLE8_SIZE]>,
    window: Window,
}

impl<P: Parser> DualHash<P> {
    #[must_use]
    pub fn new(parser: P) -> Self {
        Self {
            max_distance: 65535,
            parser,
            table4: Box::new([0; TABLE_SIZE]),
            table8: vec![0; TABLE8_SIZE].into_boxed_slice().try_into().unwrap(),
            window: Window::new(MIN_HISTORY, MAX_HISTORY),
        }
    }
}

impl<P: Parser> MatchFinder for DualHash<P> {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        let (start, delta) = self.window.append(src);
        if delta > 0 {
            rebase_positions(&mut self.table4[..], delta);
            rebase_positions(&mut self.table8[..], delta);
        }

        let end = self.window.len();
        let mut searcher = DualHashSearcher {
            table4: &mut *self.table4,
            table8: &mut *self.table8,
            history: self.window.bytes(),
            max_distance: self.max_distance,
        };
        self.parser.parse(dst, &mut searcher, start, end);
    }

    fn reset(&mut self) {
        self.table4.fill(0);
        self.table8.fill(0);
        self.window.reset();
    }
}

struct DualHashSearcher<'a> {
    table4: &'a mut [u32; TABLE_SIZE],
    table8: &'a mut [u32; TABLE8_SIZE],
    history: &'a [u8],
    max_distance: usize,
}

impl Searcher for DualHashSearcher<'_> {
    fn search(&mut self, dst: &mut Vec<AbsoluteMatch>, pos: usize, min: usize, max: usize) {
        if pos + 4 > self.history.len() {
            return;
        }
        let src = self.history;

        let h4 = hash4(LittleEndian::read_u32(&src[pos..])) as usize;
        let candidate4 = self.table4[h4 & TABLE_MASK] as usize;
        self.table4[h4 & TABLE_MASK] = pos as u32;

        if candidate4 != 0
            && pos - candidate4 <= self.max_distance
            && LittleEndian::read_u32(&src[pos..]) == LittleEndian::read_u32(&src[candidate4..])
        {
            // We have a 4-byte match now.
            let end = extend(&src[..max], candidate4 + 4, pos + 4);
            let (start, match_pos) = extend_backward(src, pos, candidate4, min);

            dst.push(AbsoluteMatch {
                start,
                end,
                match_pos,
            });
        }

        if pos + 8 > src.len() {
            return;
        }

        let h8 = hash8(LittleEndian::read_u64(&src[pos..])) as usize;
        let candidate8 = self.table8[h8 & TABLE8_MASK] as usize;
        self.table8[h8 & TABLE8_MASK] = pos as u32;

        if candidate8 != 0
            && candidate8 != candidate4
            && pos - candidate8 <= self.max_distance
            && LittleEndian::read_u64(&src[pos..]) == LittleEndian::read_u64(&src[candidate8..])
        {
            // We have an 8-byte match now.
            let end = extend(&src[..max], candidate8 + 8, pos + 8);
            let (start, match_pos) = extend_backward(src, pos, candidate8, min);

            dst.push(AbsoluteMatch {
                start,
                end,
                match_pos,
            });
        }
    }
}
