////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! A cost model for ranking candidate matches, used by the ratio-oriented
//! match finders to balance match length against log-distance cost.

use crate::AbsoluteMatch;

pub(crate) const LITERAL_BYTE_SCORE: i32 = 135;

pub(crate) const DISTANCE_BIT_PENALTY: i32 = 30;

/// Score must stay positive after applying the maximal distance penalty.
pub(crate) const SCORE_BASE: i32 = DISTANCE_BIT_PENALTY * 8 * 8;

/// A candidate scoring below this is not worth emitting at all.
pub(crate) const MIN_SCORE: i32 = SCORE_BASE + 100;

/// Usually the longest backward reference wins. A reference that is
/// further away is usually coded with more bits, approximated here as
/// `log2(distance)`, so a slightly longer match at a much larger distance
/// can lose to a shorter, closer one.
///
/// `offset` must be positive.
pub(crate) fn backward_reference_score(copy_length: usize, offset: usize) -> i32 {
    SCORE_BASE + LITERAL_BYTE_SCORE * copy_length as i32
        - DISTANCE_BIT_PENALTY * offset.ilog2() as i32
}

/// A match at the same distance as the previous one is cheap to encode in
/// most formats, so it gets a flat bonus instead of the distance penalty.
pub(crate) fn backward_reference_score_using_last_distance(copy_length: usize) -> i32 {
    LITERAL_BYTE_SCORE * copy_length as i32 + SCORE_BASE + 15
}

/// Scoring adapter for [`OverlapParser`](crate::parse::OverlapParser):
/// rank an absolute match by the backward-reference cost model instead of
/// raw length.
#[must_use]
pub fn score(m: AbsoluteMatch) -> i32 {
    backward_reference_score(m.end - m.start, m.start - m.match_pos)
}
