//! Shared helpers for the integration tests: a reference materializer
//! that replays a match stream and checks the LZ77 invariants along the
//! way.

use lzpack::{Match, MatchFinder};

/// Replays one block's matches on top of the output reconstructed so
/// far, checking that every record is sound: literals and copies cover
/// the block exactly, copy distances stay within the reconstructed
/// stream, and every copied byte reproduces the input.
pub fn apply_block(out: &mut Vec<u8>, src: &[u8], matches: &[Match]) {
    let mut pos = 0;
    for (k, m) in matches.iter().enumerate() {
        let unmatched = m.unmatched as usize;
        let length = m.length as usize;

        assert!(
            pos + unmatched <= src.len(),
            "literal run of {unmatched} at {pos} overruns the block"
        );
        out.extend_from_slice(&src[pos..pos + unmatched]);
        pos += unmatched;

        if length == 0 {
            assert_eq!(m.distance, 0, "zero-length match with a distance");
            assert_eq!(k, matches.len() - 1, "zero-length match before the end");
            continue;
        }

        let distance = m.distance as usize;
        assert!(distance >= 1, "copy with zero distance");
        assert!(
            distance <= out.len(),
            "distance {distance} reaches before the start of the stream"
        );
        for _ in 0..length {
            let b = out[out.len() - distance];
            out.push(b);
        }
        assert!(pos + length <= src.len(), "copy overruns the block");
        assert_eq!(
            &out[out.len() - length..],
            &src[pos..pos + length],
            "copy of {length} at distance {distance} does not reproduce the input"
        );
        pos += length;
    }
    assert_eq!(pos, src.len(), "matches cover {pos} of {} bytes", src.len());
}

/// Runs `src` through `finder` in `block_size`-byte blocks, checks every
/// invariant, and returns the concatenated match stream.
pub fn round_trip(finder: &mut dyn MatchFinder, src: &[u8], block_size: usize) -> Vec<Match> {
    let mut out = Vec::with_capacity(src.len());
    let mut all = vec![];
    for block in src.chunks(block_size.max(1)) {
        let mut matches = vec![];
        finder.find_matches(&mut matches, block);
        apply_block(&mut out, block, &matches);
        all.extend_from_slice(&matches);
    }
    assert_eq!(out, src, "reconstructed stream differs from the input");
    all
}

/// The number of input bytes covered by copies rather than literals.
pub fn matched_bytes(matches: &[Match]) -> usize {
    matches.iter().map(|m| m.length as usize).sum()
}
