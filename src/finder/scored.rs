////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

use byteorder::{ByteOrder, LittleEndian};

use crate::extend::extend;
use crate::hasher::Hasher;
use crate::matches::push_match;
use crate::score::{
    MIN_SCORE, backward_reference_score, backward_reference_score_using_last_distance,
};
use crate::window::Window;
use crate::{Match, MatchFinder};

/// `ScoredMatchFinder` drives a [Hasher] over the sliding window and
/// ranks the candidates with the backward-reference cost model, so a
/// shorter match at a small (or repeated) distance can beat a longer one
/// far away.
pub struct ScoredMatchFinder<H> {
    hasher: H,

    /// The longest match to emit as a single record; longer matches are
    /// split. 0 means unlimited.
    pub max_length: usize,

    /// The limit on the distance to look back for matches; 0 means
    /// unlimited.
    pub max_distance: usize,

    // max_history == 0 means no history is kept and every block stands
    // alone.
    max_history: usize,
    min_history: usize,

    window: Window,
    initialized: bool,
    candidate_cache: Vec<usize>,
}

impl<H: Hasher> ScoredMatchFinder<H> {
    /// A finder with no history buffer: the hasher is reinitialized on
    /// every block and matches never cross block boundaries.
    #[must_use]
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            max_length: 0,
            max_distance: 0,
            max_history: 0,
            min_history: 0,
            window: Window::new(0, 0),
            initialized: false,
            candidate_cache: Vec::new(),
        }
    }

    /// A history-aware finder: blocks accumulate in a window that is
    /// trimmed back to `min_history` whenever it outgrows `max_history`,
    /// and the hasher is re-primed over the retained history after each
    /// trim.
    #[must_use]
    pub fn with_history(hasher: H, min_history: usize, max_history: usize) -> Self {
        Self {
            hasher,
            max_length: 0,
            max_distance: 0,
            max_history,
            min_history,
            window: Window::new(min_history, max_history),
            initialized: false,
            candidate_cache: Vec::new(),
        }
    }

    /// Checks whether there is a usable match for `pos` at `candidate`,
    /// returning the match position and length (or zeros).
    fn check_match(&self, src: &[u8], pos: usize, candidate: usize) -> (usize, usize) {
        if candidate == 0 {
            return (0, 0);
        }

        if candidate < pos
            && (self.max_distance == 0 || pos - candidate <= self.max_distance)
            && LittleEndian::read_u32(&src[pos..]) == LittleEndian::read_u32(&src[candidate..])
        {
            let end = extend(src, candidate + 4, pos + 4);
            return (candidate, end - pos);
        }

        (0, 0)
    }
}

impl<H: Hasher> MatchFinder for ScoredMatchFinder<H> {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        let block;
        let (src, s, mut next_emit): (&[u8], usize, usize) = if self.max_history == 0 {
            // Don't use the history buffer, and start with a freshly
            // initialized hasher.
            self.hasher.init();
            (src, 1, 0)
        } else {
            let (start, delta) = self.window.append(src);
            block = self.window.bytes();
            if delta > 0 {
                // The window was rebased; rebuild the hasher from the
                // retained history instead of remapping it.
                self.hasher.init();
                let mut i = 1;
                while i < self.min_history && i + 8 < block.len() {
                    self.hasher.store(block, i);
                    i += 1;
                }
            } else if !self.initialized {
                self.hasher.init();
                self.initialized = true;
            }
            (block, start, start)
        };

        // s_limit is when to stop looking for copies; the margin gives us
        // room for the 64-bit loads used in hashing.
        let s_limit = src.len().saturating_sub(8);

        let mut candidates = std::mem::take(&mut self.candidate_cache);
        let mut prev_distance = 0_usize;
        let mut s = s;

        if s <= s_limit {
            'outer: loop {
                // Heuristic match skipping, as in the snappy scan loop: the
                // stride grows by one for every 32 bytes scanned without an
                // acceptable match.
                let mut skip = 32_usize;

                let mut next_s = s;
                let mut match_pos: usize;
                let mut match_len: usize;
                let mut best_score: i32;
                loop {
                    s = next_s;
                    let bytes_between_hash_lookups = skip >> 5;
                    next_s = s + bytes_between_hash_lookups;
                    skip += bytes_between_hash_lookups;
                    if next_s > s_limit {
                        break 'outer;
                    }
                    match_pos = 0;
                    match_len = 0;
                    best_score = 0;
                    if prev_distance != 0 {
                        // Often there is a match at the same distance back as
                        // the previous one. Check for that first.
                        let candidate = s - prev_distance;
                        let (m, ml) = self.check_match(src, s, candidate);
                        let score = backward_reference_score_using_last_distance(ml);
                        if score > best_score {
                            match_pos = m;
                            match_len = ml;
                            best_score = score;
                        }
                    }
                    candidates.clear();
                    self.hasher.candidates(&mut candidates, src, s);
                    for &c in &candidates {
                        let (m, ml) = self.check_match(src, s, c);
                        let score = backward_reference_score(ml, s - m);
                        if score > best_score {
                            match_pos = m;
                            match_len = ml;
                            best_score = score;
                        }
                    }
                    if best_score > MIN_SCORE {
                        break;
                    }
                }

                // We have found a match of at least 4 bytes at s.
                let mut base = s;
                let orig_base = base;

                // Lazy matching over a short look-ahead window: a nearby
                // later match only wins if it beats the current one by a
                // clear margin.
                let mut found = true;
                let mut i = orig_base + 1;
                while i < orig_base + 5 && i < s_limit && found {
                    found = false;
                    let lazy_threshold = best_score + 175;
                    candidates.clear();
                    self.hasher.candidates(&mut candidates, src, i);
                    for &c in &candidates {
                        let (m, ml) = self.check_match(src, i, c);
                        let score = backward_reference_score(ml, i - m);
                        if score > best_score && score > lazy_threshold {
                            base = i;
                            match_pos = m;
                            match_len = ml;
                            best_score = score;
                            found = true;
                        }
                    }
                    i += 1;
                }

                // Extend the match backward if possible.
                while base > next_emit && match_pos > 0 && src[match_pos - 1] == src[base - 1] {
                    match_pos -= 1;
                    base -= 1;
                    match_len += 1;
                }

                s = base + match_len;

                push_match(dst, base - next_emit, s - base, base - match_pos, self.max_length);
                next_emit = s;
                prev_distance = base - match_pos;
                if s >= s_limit {
                    break 'outer;
                }

                // We could immediately start working at s now, but to
                // improve compression we first update the hash table.
                for i in orig_base + 1..s {
                    self.hasher.store(src, i);
                }
            }
        }

        if next_emit < src.len() {
            dst.push(Match::literal(src.len() - next_emit));
        }
        candidates.clear();
        self.candidate_cache = candidates;
    }

    fn reset(&mut self) {
        self.hasher.init();
        self.window.reset();
        self.initialized = false;
    }
}
