////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! The intermediate representation shared between match finders and
//! encoders, and the two traits that join them.

/// A Match is the basic unit of LZ77 compression: consume `unmatched`
/// literal bytes from the input, then copy `length` bytes from `distance`
/// bytes back in the output stream.
///
/// `length` may be 0 only on a trailing record that carries final literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Match {
    /// the number of unmatched bytes since the previous match
    pub unmatched: u32,
    /// the number of bytes in the matched string
    pub length: u32,
    /// how far back in the stream to copy from; never 0 when `length > 0`
    pub distance: u32,
}

impl Match {
    /// Create a new copy record from byte-index arithmetic.
    #[must_use]
    pub fn new(unmatched: usize, length: usize, distance: usize) -> Self {
        Self {
            unmatched: unmatched as u32,
            length: length as u32,
            distance: distance as u32,
        }
    }

    /// Create a pure-literal record, legal only at the end of a block.
    #[must_use]
    pub fn literal(unmatched: usize) -> Self {
        Self {
            unmatched: unmatched as u32,
            length: 0,
            distance: 0,
        }
    }
}

/// An `AbsoluteMatch` is like a [Match], but it stores indexes into the
/// byte stream instead of lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsoluteMatch {
    /// index of the first byte of the match
    pub start: usize,
    /// index of the byte after the last byte (`end - start` = length)
    pub end: usize,
    /// index of the previous data that matches (`start - match_pos` = distance)
    pub match_pos: usize,
}

impl AbsoluteMatch {
    /// Length of the match. Trimming can push `end` below `start`; that
    /// counts as empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `MatchFinder` performs the LZ77 stage of compression, looking for
/// matches.
pub trait MatchFinder {
    /// Looks for matches in `src` and appends them to `dst`. The appended
    /// records cover `src` exactly: their `unmatched + length` values sum
    /// to `src.len()`.
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]);

    /// Clears any internal state, preparing the finder to be used with a
    /// new stream.
    fn reset(&mut self);

    /// The hard per-block limit of this finder, if it has one. Callers
    /// that drive blocks through [`Writer`](crate::Writer) are checked
    /// against it up front.
    fn max_block_size(&self) -> Option<usize> {
        None
    }
}

impl<T: MatchFinder + ?Sized> MatchFinder for Box<T> {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        (**self).find_matches(dst, src);
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn max_block_size(&self) -> Option<usize> {
        (**self).max_block_size()
    }
}

impl<T: MatchFinder + ?Sized> MatchFinder for &mut T {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        (**self).find_matches(dst, src);
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn max_block_size(&self) -> Option<usize> {
        (**self).max_block_size()
    }
}

/// An `Encoder` serializes a block and its matches in a concrete output
/// format.
pub trait Encoder {
    /// Appends the appropriate stream header to `dst`, if the format has
    /// one.
    fn header(&mut self, dst: &mut Vec<u8>);

    /// Appends the encoded form of `src` to `dst`, using the match
    /// information from `matches`. Must consume exactly the bytes covered
    /// by `matches`.
    fn encode(&mut self, dst: &mut Vec<u8>, src: &[u8], matches: &[Match], last_block: bool);

    /// Clears any internal state, preparing the encoder to be used with a
    /// new stream.
    fn reset(&mut self);
}

impl<T: Encoder + ?Sized> Encoder for &mut T {
    fn header(&mut self, dst: &mut Vec<u8>) {
        (**self).header(dst);
    }

    fn encode(&mut self, dst: &mut Vec<u8>, src: &[u8], matches: &[Match], last_block: bool) {
        (**self).encode(dst, src, matches, last_block);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// `AutoReset` wraps a `MatchFinder`, resetting it before every block so
/// that no matches reach back across block boundaries.
pub struct AutoReset<F>(pub F);

impl<F: MatchFinder> MatchFinder for AutoReset<F> {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        self.0.reset();
        self.0.find_matches(dst, src);
    }

    fn reset(&mut self) {
        self.0.reset();
    }

    fn max_block_size(&self) -> Option<usize> {
        self.0.max_block_size()
    }
}

/// Appends a match, splitting it into several records when it exceeds
/// `max_length` (0 means unlimited). Every piece except the last is
/// exactly `max_length` long; the last is always at least 4 bytes, which
/// may require shortening the piece before it.
pub(crate) fn push_match(
    dst: &mut Vec<Match>,
    mut unmatched: usize,
    mut length: usize,
    distance: usize,
    max_length: usize,
) {
    if max_length > 0 {
        while length > max_length {
            let piece = if length < max_length + 4 {
                length - 4
            } else {
                max_length
            };
            dst.push(Match::new(unmatched, piece, distance));
            unmatched = 0;
            length -= piece;
        }
    }
    dst.push(Match::new(unmatched, length, distance));
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    #[proptest]
    fn split_pieces_cover_the_whole_match(
        #[strategy(0_usize..100)] unmatched: usize,
        #[strategy(4_usize..10_000)] length: usize,
        #[strategy(1_usize..65_536)] distance: usize,
        #[strategy(8_usize..300)] max_length: usize,
    ) {
        let mut dst = vec![];
        push_match(&mut dst, unmatched, length, distance, max_length);

        let total: usize = dst.iter().map(|m| (m.unmatched + m.length) as usize).sum();
        prop_assert_eq!(total, unmatched + length);
        prop_assert!(dst.iter().all(|m| m.length as usize <= max_length));
        prop_assert!(dst.iter().all(|m| m.distance as usize == distance));
        prop_assert!(dst.last().unwrap().length >= 4);
        prop_assert_eq!(dst[0].unmatched as usize, unmatched);
        prop_assert!(dst[1..].iter().all(|m| m.unmatched == 0));
    }

    #[test]
    fn unlimited_length_is_not_split() {
        let mut dst = vec![];
        push_match(&mut dst, 3, 1_000_000, 1, 0);
        assert_eq!(dst, vec![Match::new(3, 1_000_000, 1)]);
    }
}
