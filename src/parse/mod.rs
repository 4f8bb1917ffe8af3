////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! Parsers resolve the candidate matches produced by a [Searcher] into a
//! cover of the block: a sorted, non-overlapping sequence of matches whose
//! literals and copies partition the block exactly.

mod overlap;

pub use overlap::OverlapParser;

use crate::{AbsoluteMatch, Match};

/// A `Searcher` is the source of matches for a [Parser]. It is a
/// lower-level interface than [MatchFinder](crate::MatchFinder), only
/// looking for matches at one position at a time.
pub trait Searcher {
    /// Looks for matches at `pos` and appends them to `dst`. In each
    /// match, `start` and `end` fall within `[min, max)`, and
    /// `match_pos < start < end`.
    ///
    /// Searching also inserts `pos` into the underlying index, so the
    /// order of `search` calls affects which candidates later calls see.
    fn search(&mut self, dst: &mut Vec<AbsoluteMatch>, pos: usize, min: usize, max: usize);
}

/// A `Parser` chooses which matches to use to compress the data.
pub trait Parser {
    /// Gets matches covering `[start, end)` from `src`, chooses which ones
    /// to use, and appends them to `dst`.
    fn parse(&mut self, dst: &mut Vec<Match>, src: &mut dyn Searcher, start: usize, end: usize);
}

/// A `GreedyParser` implements the greedy matching strategy: it goes from
/// start to end, choosing the longest match at each position.
#[derive(Default)]
pub struct GreedyParser {
    match_cache: Vec<AbsoluteMatch>,
}

impl GreedyParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parser for GreedyParser {
    fn parse(&mut self, dst: &mut Vec<Match>, src: &mut dyn Searcher, start: usize, end: usize) {
        let mut matches = std::mem::take(&mut self.match_cache);
        let mut s = start;
        let mut next_emit = start;

        'main: loop {
            let mut next_s = s;
            let m = loop {
                s = next_s;
                next_s = s + 1;
                if next_s >= end {
                    break 'main;
                }

                matches.clear();
                src.search(&mut matches, s, next_emit, end);
                let m = longest_match(&matches);
                if m.end >= m.start + 4 {
                    break m;
                }
            };

            dst.push(Match::new(
                m.start - next_emit,
                m.end - m.start,
                m.start - m.match_pos,
            ));
            s = m.end;
            next_emit = s;
        }

        if next_emit < end {
            dst.push(Match::literal(end - next_emit));
        }
        matches.clear();
        self.match_cache = matches;
    }
}

fn longest_match(matches: &[AbsoluteMatch]) -> AbsoluteMatch {
    let mut longest = AbsoluteMatch::default();

    for &m in matches {
        if m.len() > longest.len() {
            longest = m;
        }
    }

    longest
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A Searcher that replays a fixed script of candidates, for driving
    /// parsers without a real index.
    pub(crate) struct Scripted {
        pub candidates: Vec<AbsoluteMatch>,
    }

    impl Searcher for Scripted {
        fn search(&mut self, dst: &mut Vec<AbsoluteMatch>, pos: usize, min: usize, max: usize) {
            for &m in &self.candidates {
                if m.start == pos && m.start >= min && m.end <= max {
                    dst.push(m);
                }
            }
        }
    }

    pub(crate) fn cover_is_sound(matches: &[Match], len: usize) -> bool {
        let covered: usize = matches
            .iter()
            .map(|m| (m.unmatched + m.length) as usize)
            .sum();
        covered == len && matches.iter().all(|m| m.length > 0 || m.distance == 0)
    }

    #[test]
    fn picks_the_longest_candidate_at_each_position() {
        let mut searcher = Scripted {
            candidates: vec![
                AbsoluteMatch { start: 4, end: 10, match_pos: 0 },
                AbsoluteMatch { start: 4, end: 14, match_pos: 1 },
                AbsoluteMatch { start: 20, end: 26, match_pos: 4 },
            ],
        };
        let mut parser = GreedyParser::new();
        let mut dst = vec![];
        parser.parse(&mut dst, &mut searcher, 0, 30);

        assert_eq!(
            dst,
            vec![
                Match::new(4, 10, 3),
                Match::new(6, 6, 16),
                Match::literal(4),
            ]
        );
        assert!(cover_is_sound(&dst, 30));
    }

    #[test]
    fn block_without_candidates_is_all_literals() {
        let mut searcher = Scripted { candidates: vec![] };
        let mut parser = GreedyParser::new();
        let mut dst = vec![];
        parser.parse(&mut dst, &mut searcher, 0, 17);

        assert_eq!(dst, vec![Match::literal(17)]);
    }

    #[test]
    fn short_candidates_are_ignored() {
        let mut searcher = Scripted {
            candidates: vec![AbsoluteMatch { start: 2, end: 5, match_pos: 0 }],
        };
        let mut parser = GreedyParser::new();
        let mut dst = vec![];
        parser.parse(&mut dst, &mut searcher, 0, 10);

        assert_eq!(dst, vec![Match::literal(10)]);
    }
}
