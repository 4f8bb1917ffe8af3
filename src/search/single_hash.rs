////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

use byteorder::{ByteOrder, LittleEndian};

use crate::extend::{extend, extend_backward};
use crate::parse::{GreedyParser, Parser, Searcher};
use crate::search::{TABLE_MASK, TABLE_SIZE, hash4};
use crate::window::{MAX_HISTORY, MIN_HISTORY, Window, rebase_positions};
use crate::{AbsoluteMatch, Match, MatchFinder};

/// `SingleHash` is a match finder that uses a simple 4-byte hash over the
/// sliding window to find matches, resolved by a pluggable parser.
pub struct SingleHash<P = GreedyParser> {
    /// The maximum distance (in bytes) to look back for a match.
    pub max_distance: usize,

    parser: P,
    table: Box<[u32; TABLE_SIZE]>,
    window: Window,
}

impl<P: Parser> SingleHash<P> {
    #[must_use]
    pub fn new(parser: P) -> Self {
        Self {
            max_distance: 65535,
            parser,
            table: Box::new([0; TABLE_SIZE]),
            window: Window::new(MIN_HISTORY, MAX_HISTORY),
        }
    }
}

impl<P: Parser> MatchFinder for SingleHash<P> {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        let (start, delta) = self.window.append(src);
        if delta > 0 {
            rebase_positions(&mut self.table[..], delta);
        }

        let end = self.window.len();
        let mut searcher = SingleHashSearcher {
            table: &mut *self.table,
            history: self.window.bytes(),
            max_distance: self.max_distance,
        };
        self.parser.parse(dst, &mut searcher, start, end);
    }

    fn reset(&mut self) {
        self.table.fill(0);
        self.window.reset();
    }
}

struct SingleHashSearcher<'a> {
    table: &'a mut [u32; TABLE_SIZE],
    history: &'a [u8],
    max_distance: usize,
}

impl Searcher for SingleHashSearcher<'_> {
    fn search(&mut self, dst: &mut Vec<AbsoluteMatch>, pos: usize, min: usize, max: usize) {
        if pos + 4 > self.history.len() {
            return;
        }
        let src = self.history;

        let h = hash4(LittleEndian::read_u32(&src[pos..])) as usize;
        let candidate = self.table[h & TABLE_MASK] as usize;
        self.table[h & TABLE_MASK] = pos as u32;

        if candidate == 0 || pos - candidate > self.max_distance {
            return;
        }

        if LittleEndian::read_u32(&src[pos..]) != LittleEndian::read_u32(&src[candidate..]) {
            return;
        }

        // We have a 4-byte match now.
        let end = extend(&src[..max], candidate + 4, pos + 4);
        let (start, match_pos) = extend_backward(src, pos, candidate, min);

        dst.push(AbsoluteMatch {
            start,
            end,
            match_pos,
        });
    }
}

/// `SingleHashGreedy` is [SingleHash] with the greedy parser inlined, for
/// the common fast path.
pub struct SingleHashGreedy {
    /// The maximum distance (in bytes) to look back for a match.
    pub max_distance: usize,

    table: Box<[u32; TABLE_SIZE]>,
    window: Window,
}

impl SingleHashGreedy {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_distance: 65535,
            table: Box::new([0; TABLE_SIZE]),
            window: Window::new(MIN_HISTORY, MAX_HISTORY),
        }
    }

    fn search(&mut self, pos: usize, min: usize, max: usize) -> AbsoluteMatch {
        if pos + 4 > self.window.len() {
            return AbsoluteMatch::default();
        }
        let src = self.window.bytes();

        let h = hash4(LittleEndian::read_u32(&src[pos..])) as usize;
        let candidate = self.table[h & TABLE_MASK] as usize;
        self.table[h & TABLE_MASK] = pos as u32;

        if candidate == 0 || pos - candidate > self.max_distance {
            return AbsoluteMatch::default();
        }

        if LittleEndian::read_u32(&src[pos..]) != LittleEndian::read_u32(&src[candidate..]) {
            return AbsoluteMatch::default();
        }

        let end = extend(&src[..max], candidate + 4, pos + 4);
        let (start, match_pos) = extend_backward(src, pos, candidate, min);

        AbsoluteMatch {
            start,
            end,
            match_pos,
        }
    }
}

impl Default for SingleHashGreedy {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder for SingleHashGreedy {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        let (start, delta) = self.window.append(src);
        if delta > 0 {
            rebase_positions(&mut self.table[..], delta);
        }

        let end = self.window.len();
        let mut s = start;
        let mut next_emit = start;

        while s < end {
            let m = self.search(s, next_emit, end);
            if m.len() < 4 {
                s += 1;
                continue;
            }

            dst.push(Match::new(
                m.start - next_emit,
                m.end - m.start,
                m.start - m.match_pos,
            ));
            next_emit = m.end;
            s = next_emit;
        }

        if next_emit < end {
            dst.push(Match::literal(end - next_emit));
        }
    }

    fn reset(&mut self) {
        self.table.fill(0);
        self.window.reset();
    }
}
