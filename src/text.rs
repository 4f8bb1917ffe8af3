////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

use crate::{Encoder, Match};

/// A `TextEncoder` is an [Encoder] that produces a human-readable
/// rendering of the LZ77 stream: literal bytes pass through and matches
/// are replaced with `<length,distance>` symbols. Useful for debugging
/// match finders and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextEncoder;

impl Encoder for TextEncoder {
    fn header(&mut self, _dst: &mut Vec<u8>) {}

    fn encode(&mut self, dst: &mut Vec<u8>, src: &[u8], matches: &[Match], _last_block: bool) {
        let mut pos = 0;
        for m in matches {
            if m.unmatched > 0 {
                dst.extend_from_slice(&src[pos..pos + m.unmatched as usize]);
                pos += m.unmatched as usize;
            }
            if m.length > 0 {
                dst.extend_from_slice(format!("<{},{}>", m.length, m.distance).as_bytes());
                pos += m.length as usize;
            }
        }
        if pos < src.len() {
            dst.extend_from_slice(&src[pos..]);
        }
    }

    fn reset(&mut self) {}
}
