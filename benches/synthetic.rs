////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lzpack::finder::{LazyMatchFinder, QuickMatchFinder};
use lzpack::{MatchFinder, level};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BLOCK_SIZE: usize = 1 << 16;
const SIZES: [usize; 4] = [1 << 12, 1 << 14, 1 << 16, 1 << 18];
const MAX_SIZE: usize = 1 << 18;

/// Synthetic corpora at the extremes of match structure: pure noise (no
/// matches to find), cyclic text (short-range matches everywhere), and a
/// single run (one giant match per block).
fn corpora() -> Vec<(&'static str, Vec<u8>)> {
    let mut rng = StdRng::seed_from_u64(0x1E35_A7BD);
    let noise = (0..MAX_SIZE).map(|_| rng.r#gen()).collect();
    let text = b"the quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(MAX_SIZE)
        .collect();
    let run = vec![0_u8; MAX_SIZE];
    vec![("noise", noise), ("text", text), ("run", run)]
}

fn finder_set() -> Vec<(&'static str, Box<dyn MatchFinder>)> {
    vec![
        ("quick", Box::new(QuickMatchFinder::new())),
        ("lazy", Box::new(LazyMatchFinder::new())),
        ("level1", level::match_finder(1)),
        ("level5", level::match_finder(5)),
        ("level9", level::match_finder(9)),
    ]
}

fn drive(finder: &mut dyn MatchFinder, input: &[u8]) -> usize {
    let mut matches = Vec::new();
    for block in input.chunks(BLOCK_SIZE) {
        finder.find_matches(&mut matches, block);
    }
    matches.len()
}

fn find_matches_throughput(c: &mut Criterion) {
    for (corpus_name, input) in corpora() {
        let mut group = c.benchmark_group(format!("find_matches/{corpus_name}"));
        for size in SIZES {
            group.throughput(Throughput::Bytes(size as u64));
            let data = &input[..size];
            for (finder_name, mut finder) in finder_set() {
                group.bench_function(BenchmarkId::new(finder_name, size), |b| {
                    b.iter(|| {
                        finder.reset();
                        drive(finder.as_mut(), black_box(data))
                    });
                });
            }
        }
        group.finish();
    }
}

criterion_group!(benches, find_matches_throughput);
criterion_main!(benches);
