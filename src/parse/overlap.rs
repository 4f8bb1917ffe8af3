//! An overlap-resolving parser: instead of committing to the first good
//! match, it collects a chain of successively longer overlapping matches
//! and then trims them against each other into a non-overlapping cover.

use crate::parse::{Parser, Searcher};
use crate::{AbsoluteMatch, Match};

fn match_length_score(m: AbsoluteMatch) -> i32 {
    m.len() as i32
}

/// One link in the overlap chain: the currently chosen match plus the
/// range of candidate options (indexes into the shared candidate cache)
/// it was chosen from, so the choice can be redone under tighter bounds.
#[derive(Clone, Copy)]
struct MatchSet {
    chosen: AbsoluteMatch,
    options: (usize, usize),
}

/// An `OverlapParser` looks for overlapping matches and chooses the best
/// ones. At each anchor it keeps probing near the end of the current best
/// match for a strictly better one, then resolves the collected overlaps
/// back to front.
#[derive(Default)]
pub struct OverlapParser {
    /// Ranks candidates when choosing between them. When `None`, the
    /// length of the match is used as its score.
    pub score: Option<fn(AbsoluteMatch) -> i32>,

    match_cache: Vec<AbsoluteMatch>,
    set_cache: Vec<MatchSet>,
}

impl OverlapParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank candidates with `score` instead of raw length.
    #[must_use]
    pub fn with_score(score: fn(AbsoluteMatch) -> i32) -> Self {
        Self {
            score: Some(score),
            ..Self::default()
        }
    }
}

fn choose(options: &[AbsoluteMatch], score: fn(AbsoluteMatch) -> i32) -> AbsoluteMatch {
    let mut best = AbsoluteMatch::default();
    let mut max_score = 0;

    for &m in options {
        let s = score(m);
        if s > max_score {
            best = m;
            max_score = s;
        }
    }

    best
}

/// Chooses the best match from `options`, with the range limited to
/// `min..max`.
fn choose_in_range(
    options: &[AbsoluteMatch],
    min: usize,
    max: usize,
    score: fn(AbsoluteMatch) -> i32,
) -> AbsoluteMatch {
    let mut best = AbsoluteMatch::default();
    let mut max_score = 0;

    for &m in options {
        let mut m = m;
        if m.start < min {
            m.match_pos += min - m.start;
            m.start = min;
        }
        if m.end > max {
            m.end = max;
        }
        if m.end <= m.start {
            continue;
        }
        let s = score(m);
        if s > max_score {
            best = m;
            max_score = s;
        }
    }

    best
}

impl Parser for OverlapParser {
    fn parse(&mut self, dst: &mut Vec<Match>, src: &mut dyn Searcher, start: usize, end: usize) {
        let score = self.score.unwrap_or(match_length_score);
        let mut cache = std::mem::take(&mut self.match_cache);
        let mut match_list = std::mem::take(&mut self.set_cache);
        let mut s = start;
        let mut next_emit = start;

        while s < end {
            match_list.clear();
            cache.clear();

            src.search(&mut cache, s, next_emit, end);
            let mut cur = MatchSet {
                chosen: choose(&cache, score),
                options: (0, cache.len()),
            };
            if cur.chosen.len() < 4 {
                s += 1;
                continue;
            }
            match_list.push(cur);

            loop {
                // Look for a new match overlapping the end of the current one.
                let cache_len = cache.len();
                src.search(&mut cache, cur.chosen.end - 2, cur.chosen.start, end);
                let new_match = MatchSet {
                    chosen: choose(&cache[cache_len..], score),
                    options: (cache_len, cache.len()),
                };
                if new_match.chosen.is_empty()
                    || score(new_match.chosen) <= score(cur.chosen)
                {
                    // It's no better than the previous match, so ignore it.
                    break;
                }
                cur = new_match;
                match_list.push(cur);
            }

            // We now have a series of overlapping matches, each one longer
            // than the previous one. Now we need to resolve the overlaps.
            let mut i = match_list.len() as isize - 2;
            while i >= 0 {
                let iu = i as usize;
                if match_list[iu].chosen.len() > match_list[iu + 1].chosen.len() {
                    // This match is actually longer than the following one,
                    // probably because the following one has already been
                    // trimmed. So trim the following one to remove the
                    // overlap with this match.
                    if match_list[iu].chosen.end > match_list[iu + 1].chosen.start {
                        let lo = match_list[iu].chosen.end;
                        let hi = if iu + 2 < match_list.len() {
                            match_list[iu + 2].chosen.start
                        } else {
                            end
                        };
                        let (opt_lo, opt_hi) = match_list[iu + 1].options;
                        match_list[iu + 1].chosen =
                            choose_in_range(&cache[opt_lo..opt_hi], lo, hi, score);
                    }
                    if match_list[iu + 1].chosen.len() < 4 {
                        // The following match is too short now; drop it and
                        // revisit the same index to catch overlaps with the
                        // new neighbor.
                        match_list.remove(iu + 1);
                        if iu < match_list.len() - 1 {
                            i += 1;
                        }
                    }
                } else {
                    // The following match is longer than this one, so trim
                    // this one to remove the overlap.
                    if match_list[iu].chosen.end > match_list[iu + 1].chosen.start {
                        let hi = match_list[iu + 1].chosen.start;
                        let (opt_lo, opt_hi) = match_list[iu].options;
                        match_list[iu].chosen =
                            choose_in_range(&cache[opt_lo..opt_hi], next_emit, hi, score);
                    }
                    if match_list[iu].chosen.len() < 4 {
                        match_list.remove(iu);
                    }
                }
                i -= 1;
            }

            for set in &match_list {
                let m = set.chosen;
                dst.push(Match::new(
                    m.start - next_emit,
                    m.end - m.start,
                    m.start - m.match_pos,
                ));
                next_emit = m.end;
            }
            s = next_emit;
        }

        if next_emit < end {
            dst.push(Match::literal(end - next_emit));
        }

        cache.clear();
        match_list.clear();
        self.match_cache = cache;
        self.set_cache = match_list;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tests::{Scripted, cover_is_sound};

    #[test]
    fn non_overlapping_candidates_pass_through() {
        let mut searcher = Scripted {
            candidates: vec![
                AbsoluteMatch { start: 2, end: 8, match_pos: 0 },
                AbsoluteMatch { start: 12, end: 20, match_pos: 3 },
            ],
        };
        let mut parser = OverlapParser::new();
        let mut dst = vec![];
        parser.parse(&mut dst, &mut searcher, 0, 24);

        assert_eq!(
            dst,
            vec![Match::new(2, 6, 2), Match::new(4, 8, 9), Match::literal(4)]
        );
        assert!(cover_is_sound(&dst, 24));
    }

    #[test]
    fn longer_overlapping_match_trims_the_earlier_one() {
        // The probe at end-2 (position 8) finds a strictly longer match,
        // so the first one is trimmed back to where the second starts.
        let mut searcher = Scripted {
            candidates: vec![
                AbsoluteMatch { start: 4, end: 10, match_pos: 0 },
                AbsoluteMatch { start: 8, end: 20, match_pos: 2 },
            ],
        };
        let mut parser = OverlapParser::new();
        let mut dst = vec![];
        parser.parse(&mut dst, &mut searcher, 0, 24);

        assert_eq!(
            dst,
            vec![Match::new(4, 4, 4), Match::new(0, 12, 6), Match::literal(4)]
        );
        assert!(cover_is_sound(&dst, 24));
    }

    #[test]
    fn overlap_chain_lengths_increase_strictly() {
        // A same-length probe result must not extend the chain.
        let mut searcher = Scripted {
            candidates: vec![
                AbsoluteMatch { start: 4, end: 12, match_pos: 0 },
                AbsoluteMatch { start: 10, end: 18, match_pos: 1 },
            ],
        };
        let mut parser = OverlapParser::new();
        let mut dst = vec![];
        parser.parse(&mut dst, &mut searcher, 0, 30);

        assert_eq!(dst, vec![Match::new(4, 8, 4), Match::literal(18)]);
    }
}
