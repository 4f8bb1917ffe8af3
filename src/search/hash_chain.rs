use byteorder::{ByteOrder, LittleEndian};

use crate::extend::{extend, extend_backward};
use crate::parse::{GreedyParser, Parser, Searcher};
use crate::search::{TABLE_MASK, TABLE_SIZE, hash4};
use crate::window::{MAX_HISTORY, MIN_HISTORY, Window, rebase_positions};
use crate::{AbsoluteMatch, Match, MatchFinder};

/// `HashChain` is a match finder that uses hash chaining to find longer
/// matches: each position stores the gap back to the previous position
/// with the same 4-byte hash, so a search can walk several candidates
/// instead of only the newest one.
pub struct HashChain<P = GreedyParser> {
    /// How many entries to examine on the hash chain.
    pub search_len: usize,

    /// The maximum distance (in bytes) to look back for a match.
    pub max_distance: usize,

    parser: P,
    table: Box<[u32; TABLE_SIZE]>,
    window: Window,
    chain: Vec<u16>,
}

impl<P: Parser> HashChain<P> {
    #[must_use]
    pub fn new(search_len: usize, parser: P) -> Self {
        Self {
            search_len,
            max_distance: 65535,
            parser,
            table: Box::new([0; TABLE_SIZE]),
            window: Window::new(MIN_HISTORY, MAX_HISTORY),
            chain: Vec::new(),
        }
    }
}

impl<P: Parser> MatchFinder for HashChain<P> {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        let (start, delta) = self.window.append(src);
        if delta > 0 {
            rebase_positions(&mut self.table[..], delta);
            // Chain entries are relative gaps, so trimming the front is
            // the whole remap.
            self.chain.drain(..delta);
        }

        // Pre-calculate hashes and chains for the newly appended bytes.
        let history = self.window.bytes();
        let mut i = self.chain.len();
        while i + 3 < history.len() {
            let h = hash4(LittleEndian::read_u32(&history[i..])) as usize;
            let candidate = self.table[h & TABLE_MASK] as usize;
            self.table[h & TABLE_MASK] = i as u32;
            if candidate == 0 || i - candidate > 65535 {
                self.chain.push(0);
            } else {
                self.chain.push((i - candidate) as u16);
            }
            i += 1;
        }

        let end = self.window.len();
        let mut searcher = ChainSearcher {
            history: self.window.bytes(),
            chain: &self.chain,
            search_len: self.search_len,
            max_distance: self.max_distance,
        };
        self.parser.parse(dst, &mut searcher, start, end);
    }

    fn reset(&mut self) {
        self.table.fill(0);
        self.window.reset();
        self.chain.clear();
    }
}

struct ChainSearcher<'a> {
    history: &'a [u8],
    chain: &'a [u16],
    search_len: usize,
    max_distance: usize,
}

impl Searcher for ChainSearcher<'_> {
    fn search(&mut self, dst: &mut Vec<AbsoluteMatch>, pos: usize, min: usize, max: usize) {
        if pos >= self.chain.len() || pos + 4 > self.history.len() {
            return;
        }
        let src = self.history;
        let search_seq = LittleEndian::read_u32(&src[pos..]);

        let mut length = 0;
        let mut candidate = pos;

        for _ in 0..self.search_len {
            let d = self.chain[candidate] as usize;
            if d == 0 {
                break;
            }
            if candidate < d {
                break;
            }
            candidate -= d;
            if pos - candidate > self.max_distance {
                break;
            }
            if LittleEndian::read_u32(&src[candidate..]) != search_seq {
                continue;
            }

            let new_end = extend(&src[..max], candidate + 4, pos + 4);
            let (new_start, new_match) = extend_backward(src, pos, candidate, min);

            if new_end - new_start > length {
                dst.push(AbsoluteMatch {
                    start: new_start,
                    end: new_end,
                    match_pos: new_match,
                });
                length = new_end - new_start;
            }
        }
    }
}
