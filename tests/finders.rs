//! Invariant tests run across the whole match finder matrix: full
//! coverage, sound references, bounded distances, reset idempotence, and
//! correctness across window rebases.

mod common;

use common::{matched_bytes, round_trip};
use lzpack::finder::{
    DualHashLookahead, LazyMatchFinder, M0, M1, QuickMatchFinder, ScoredMatchFinder,
    SingleHashLookahead,
};
use lzpack::hasher::{CompositeHasher, H2, H3, H4, H5, H6};
use lzpack::parse::{GreedyParser, OverlapParser};
use lzpack::search::{DualHash, HashChain, SingleHash, SingleHashGreedy};
use lzpack::{AutoReset, MatchFinder, level, score};
use proptest::prelude::*;
use test_strategy::proptest;

fn finder_matrix() -> Vec<(&'static str, Box<dyn MatchFinder>)> {
    vec![
        ("single_hash/greedy", Box::new(SingleHash::new(GreedyParser::new()))),
        ("single_hash/overlap", Box::new(SingleHash::new(OverlapParser::new()))),
        (
            "single_hash/overlap_scored",
            Box::new(SingleHash::new(OverlapParser::with_score(score::score))),
        ),
        ("dual_hash/greedy", Box::new(DualHash::new(GreedyParser::new()))),
        ("dual_hash/overlap", Box::new(DualHash::new(OverlapParser::new()))),
        ("hash_chain/greedy", Box::new(HashChain::new(4, GreedyParser::new()))),
        ("hash_chain/overlap", Box::new(HashChain::new(8, OverlapParser::new()))),
        ("single_hash_greedy", Box::new(SingleHashGreedy::new())),
        ("quick", Box::new(QuickMatchFinder::new())),
        ("quick/chained", {
            let mut f = QuickMatchFinder::new();
            f.chain_blocks = true;
            Box::new(f)
        }),
        ("quick/short_matches", {
            let mut f = QuickMatchFinder::new();
            f.max_length = 64;
            Box::new(f)
        }),
        ("lazy", Box::new(LazyMatchFinder::new())),
        ("lazy/chained", {
            let mut f = LazyMatchFinder::new();
            f.chain_blocks = true;
            Box::new(f)
        }),
        ("m0", Box::new(M0::new())),
        ("m0/lazy", {
            let mut f = M0::new();
            f.lazy = true;
            Box::new(f)
        }),
        ("m0/capped", {
            let mut f = M0::new();
            f.max_distance = 32768;
            f.max_length = 258;
            Box::new(f)
        }),
        ("m1", Box::new(M1::new())),
        ("scored/h2", Box::new(ScoredMatchFinder::new(H2::new()))),
        (
            "scored/h3_history",
            Box::new(ScoredMatchFinder::with_history(H3::new(), 1 << 16, 1 << 18)),
        ),
        (
            "scored/h4_history",
            Box::new(ScoredMatchFinder::with_history(H4::new(), 1 << 16, 1 << 18)),
        ),
        (
            "scored/h5_h6",
            Box::new(ScoredMatchFinder::with_history(
                CompositeHasher::new(H5::new(2, 14), H6::new(3, 14, 8)),
                1 << 16,
                1 << 18,
            )),
        ),
        (
            "auto_reset/single_hash",
            Box::new(AutoReset(SingleHash::new(GreedyParser::new()))),
        ),
        ("lookahead/single", Box::new(SingleHashLookahead::new())),
        ("lookahead/single_hash8", Box::new(SingleHashLookahead::new().hash_len(8))),
        ("lookahead/dual", Box::new(DualHashLookahead::new())),
    ]
}

fn compressible_text(len: usize) -> Vec<u8> {
    let paragraph = b"It seems probable to me, that God in the Beginning form'd \
Matter in solid, massy, hard, impenetrable, moveable Particles, of such \
Sizes and Figures, and with such other Properties, and in such Proportion \
to Space, as most conduced to the End for which he form'd them.";
    paragraph.iter().copied().cycle().take(len).collect()
}

#[test]
fn every_finder_covers_repetitive_text() {
    let data = compressible_text(100_000);
    for (name, mut finder) in finder_matrix() {
        let matches = round_trip(finder.as_mut(), &data, 1 << 16);
        assert!(
            matched_bytes(&matches) * 2 > data.len(),
            "{name} matched too little of a repetitive input"
        );
    }
}

#[test]
fn every_finder_covers_zeros_across_blocks() {
    let data = vec![0_u8; 200_000];
    for (name, mut finder) in finder_matrix() {
        let matches = round_trip(finder.as_mut(), &data, 1 << 15);
        assert!(
            matched_bytes(&matches) * 2 > data.len(),
            "{name} matched too little of an all-zero input"
        );
    }
}

#[test]
fn every_finder_handles_tiny_and_empty_blocks() {
    for (name, mut finder) in finder_matrix() {
        for len in [0_usize, 1, 3, 4, 7, 8, 15, 16, 17, 31] {
            // Each length is its own stream; the reconstructed output in
            // round_trip starts fresh, so the finder must too.
            finder.reset();
            let data: Vec<u8> = (0..len).map(|i| (i % 7) as u8).collect();
            round_trip(finder.as_mut(), &data, 8);
            let _ = name;
        }
    }
}

#[test]
fn distance_limits_are_respected() {
    // A block of text repeated far apart: the capped finder must not
    // reference the first copy once it is out of range.
    let mut data = compressible_text(1000);
    data.extend(std::iter::repeat_n(0xAA_u8, 40_000));
    data.extend(compressible_text(1000));

    let mut finder = QuickMatchFinder::new();
    finder.max_distance = 1 << 12;
    let matches = round_trip(&mut finder, &data, 1 << 16);
    assert!(
        matches.iter().all(|m| m.distance <= 1 << 12),
        "a match exceeded the configured distance limit"
    );
}

#[test]
fn length_limits_split_long_matches() {
    let data = vec![7_u8; 10_000];
    let mut finder = QuickMatchFinder::new();
    finder.max_length = 258;
    let matches = round_trip(&mut finder, &data, 1 << 16);
    assert!(matches.iter().all(|m| m.length <= 258));
    assert!(matches.iter().filter(|m| m.length > 0).all(|m| m.length >= 4));
}

#[test]
fn reset_makes_runs_identical() {
    let data = compressible_text(50_000);
    for (name, mut finder) in finder_matrix() {
        let first = round_trip(finder.as_mut(), &data, 1 << 14);
        finder.reset();
        let second = round_trip(finder.as_mut(), &data, 1 << 14);
        assert_eq!(first, second, "{name} changed output after reset");
    }
}

#[test]
fn matches_stay_sound_across_rebases() {
    // Enough patterned data to force several window rebases in the
    // history-aware finders.
    let data = compressible_text(600_000);
    let configs: Vec<(&str, Box<dyn MatchFinder>)> = vec![
        ("single_hash", Box::new(SingleHash::new(GreedyParser::new()))),
        ("dual_hash", Box::new(DualHash::new(OverlapParser::new()))),
        ("hash_chain", Box::new(HashChain::new(4, GreedyParser::new()))),
        (
            "scored/small_window",
            Box::new(ScoredMatchFinder::with_history(H2::new(), 1 << 12, 1 << 14)),
        ),
        (
            "lookahead/small_window",
            Box::new(SingleHashLookahead::with_max_distance(1 << 12)),
        ),
    ];
    for (name, mut finder) in configs {
        round_trip(finder.as_mut(), &data, 1 << 14);
        let _ = name;
    }
}

#[test]
fn all_level_presets_round_trip() {
    let data = compressible_text(150_000);
    for level_num in 0..=9 {
        let mut finder = level::match_finder(level_num);
        let matches = round_trip(finder.as_mut(), &data, 1 << 16);
        assert!(
            matched_bytes(&matches) * 2 > data.len(),
            "level {level_num} matched too little"
        );
    }
}

#[proptest(ProptestConfig { cases: 64, ..Default::default() })]
fn arbitrary_input_round_trips_through_every_finder(
    #[strategy(proptest::collection::vec(0_u8..8, 0..2048))] data: Vec<u8>,
    #[strategy(1_usize..400)] block_size: usize,
) {
    for (name, mut finder) in finder_matrix() {
        round_trip(finder.as_mut(), &data, block_size);
        let _ = name;
    }
}

#[proptest(ProptestConfig { cases: 32, ..Default::default() })]
fn random_bytes_round_trip_through_every_finder(
    #[strategy(proptest::collection::vec(any::<u8>(), 0..4096))] data: Vec<u8>,
) {
    for (name, mut finder) in finder_matrix() {
        round_trip(finder.as_mut(), &data, 1 << 16);
        let _ = name;
    }
}
