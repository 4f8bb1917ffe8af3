//! Concrete end-to-end scenarios: known inputs with known expectations
//! about the matches a finder should produce.

mod common;

use common::{matched_bytes, round_trip};
use lzpack::finder::{M0, QuickMatchFinder, ScoredMatchFinder};
use lzpack::hasher::H6;
use lzpack::parse::GreedyParser;
use lzpack::search::SingleHash;
use lzpack::{MatchFinder, TextEncoder, compress, level};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn hello_run_is_found_at_distance_five() {
    let data = b"HelloHelloHelloHelloHelloHelloHelloHelloHelloHello, world";
    let mut finder = M0::new();
    let matches = round_trip(&mut finder, data, 1 << 16);
    assert!(
        matches.iter().any(|m| m.distance == 5 && m.length >= 45),
        "expected a distance-5 run covering the repeats, got {matches:?}"
    );
}

#[test]
fn zeros_collapse_to_a_distance_one_match() {
    let data = vec![0_u8; 1 << 16];
    let mut finder = SingleHash::new(GreedyParser::new());
    let matches = round_trip(&mut finder, &data, 1 << 16);

    let first_copy = matches.iter().find(|m| m.length > 0).unwrap();
    assert_eq!(first_copy.distance, 1);
    assert!(first_copy.length as usize >= data.len() - 2);
}

#[test]
fn incompressible_input_stays_literal() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let data: Vec<u8> = (0..65536).map(|_| rng.r#gen()).collect();

    let mut finder = QuickMatchFinder::new();
    let matches = round_trip(&mut finder, &data, 1 << 16);
    let unmatched: usize = matches.iter().map(|m| m.unmatched as usize).sum();
    assert!(
        unmatched * 100 >= data.len() * 99,
        "random input should be nearly all literals"
    );
}

#[test]
fn second_identical_block_matches_at_the_block_distance() {
    let mut rng = StdRng::seed_from_u64(42);
    let block: Vec<u8> = (0..32768).map(|_| rng.r#gen()).collect();

    let mut finder = SingleHash::new(GreedyParser::new());
    let mut out = vec![];
    for _ in 0..2 {
        let mut matches = vec![];
        finder.find_matches(&mut matches, &block);
        common::apply_block(&mut out, &block, &matches);
        if out.len() > block.len() {
            // Second block: it should be one giant copy of the first.
            assert!(
                matches
                    .iter()
                    .any(|m| m.distance == 32768 && m.length >= 32764),
                "expected the whole block to match at distance 32768, got {matches:?}"
            );
        }
    }
    assert_eq!(out.len(), 2 * block.len());
}

#[test]
fn repeated_distance_gets_the_last_distance_bonus() {
    // The same 8-byte phrase at a constant stride: once the first copy is
    // emitted, later ones should ride the previous distance.
    let mut data = Vec::new();
    for sep in [b'X', b'Y', b'Z', b'W'] {
        data.extend_from_slice(b"ABCDEFGH");
        data.push(sep);
    }
    data.extend_from_slice(b"--------padding--------");

    let mut finder = ScoredMatchFinder::new(H6::new(3, 15, 5));
    let matches = round_trip(&mut finder, &data, 1 << 16);

    let copies: Vec<_> = matches.iter().filter(|m| m.length > 0).collect();
    assert!(
        copies.iter().filter(|m| m.distance == 9).count() >= 2,
        "expected repeated matches at the stride distance, got {matches:?}"
    );
}

#[test]
fn level_presets_compress_text_well() {
    let paragraph: &[u8] = b"All these things being consider'd, it seems probable to me, \
that God in the Beginning form'd Matter in solid, massy, hard, impenetrable, \
moveable Particles, of such Sizes and Figures, and with such other Properties. ";
    let data: Vec<u8> = paragraph.iter().copied().cycle().take(1 << 20).collect();

    let mut previous = 0;
    for level_num in [0, 2, 5, 9] {
        let mut finder = level::match_finder(level_num);
        let matches = round_trip(finder.as_mut(), &data, 1 << 16);
        let matched = matched_bytes(&matches);
        assert!(
            matched * 10 >= data.len() * 9,
            "level {level_num} left too much literal"
        );
        // Higher levels should never do dramatically worse than lower ones.
        assert!(matched + (1 << 14) >= previous, "level {level_num} regressed");
        previous = matched;
    }
}

#[test]
fn text_encoder_round_trips_the_hello_run() {
    let mut finder = level::match_finder(5);
    let mut encoder = TextEncoder;
    let out = compress(
        &mut finder,
        &mut encoder,
        b"HelloHelloHelloHelloHello, world",
        1 << 16,
    )
    .unwrap();
    assert_eq!(out, b"Hello<20,5>, world");
}

#[test]
fn history_survives_many_small_blocks() {
    // Write the same sentence in many small blocks; every block after the
    // first should be found almost entirely in history.
    let sentence = b"the quick brown fox jumps over the lazy dog. ";
    let mut finder = SingleHash::new(GreedyParser::new());
    let mut out = vec![];
    let mut total_matched = 0;
    for _ in 0..50 {
        let mut matches = vec![];
        finder.find_matches(&mut matches, sentence);
        common::apply_block(&mut out, sentence, &matches);
        total_matched += matched_bytes(&matches);
    }
    assert!(total_matched >= sentence.len() * 45);
}
