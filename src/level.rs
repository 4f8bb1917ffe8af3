////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! Quality-level presets mapping a user-visible 0–9 integer to a concrete
//! match finder configuration.

use crate::MatchFinder;
use crate::finder::{M0, ScoredMatchFinder};
use crate::hasher::{CompositeHasher, H2, H3, H4, H5, H6, Hasher};

const PRESET_MIN_HISTORY: usize = 1 << 16;
const PRESET_MAX_HISTORY: usize = 1 << 20;

fn scored<H: Hasher + 'static>(hasher: H) -> Box<dyn MatchFinder> {
    Box::new(ScoredMatchFinder::with_history(
        hasher,
        PRESET_MIN_HISTORY,
        PRESET_MAX_HISTORY,
    ))
}

/// Returns a match finder that compresses at the given quality level.
/// Levels 0–9 are implemented; levels outside this range are replaced
/// with the closest level available.
#[must_use]
pub fn match_finder(level: i32) -> Box<dyn MatchFinder> {
    let level = level.clamp(0, 9);

    if level < 2 {
        let mut m0 = M0::new();
        m0.lazy = level == 1;
        return Box::new(m0);
    }

    match level {
        2 => scored(H2::new()),
        3 => scored(H3::new()),
        4 => scored(H4::new()),
        5 => scored(H6::new(3, 15, 5)),
        6 => scored(CompositeHasher::new(H4::new(), H6::new(2, 15, 8))),
        7 => scored(CompositeHasher::new(H5::new(3, 15), H6::new(3, 15, 8))),
        8 => scored(CompositeHasher::new(H5::new(3, 15), H6::new(5, 15, 8))),
        _ => scored(CompositeHasher::new(H5::new(4, 15), H6::new(6, 15, 8))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_levels_are_clamped() {
        // The clamped presets only have to be constructible; behavior is
        // covered by the integration tests.
        let _ = match_finder(-3);
        let _ = match_finder(42);
    }

    #[test]
    fn fastest_levels_are_block_capped() {
        assert_eq!(match_finder(0).max_block_size(), Some(65536));
        assert_eq!(match_finder(1).max_block_size(), Some(65536));
        assert_eq!(match_finder(5).max_block_size(), None);
    }
}
