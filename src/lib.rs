////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! A modular toolkit for the LZ77 stage of data compression.
//!
//! Most compression libraries have two main parts: something that looks
//! for repeated sequences of bytes, and an encoder that serializes the
//! result in a concrete format. The implementations are usually fused
//! together; you can't use one format's matcher with another format's
//! encoder. This crate separates the two behind the [MatchFinder] and
//! [Encoder] traits with a shared [Match] representation, so any match
//! finder can be paired with any encoder at any compression level.
//!
//! The match finders range from a snappy-style
//! [QuickMatchFinder](finder::QuickMatchFinder) to the hasher-driven,
//! cost-model-scored [ScoredMatchFinder](finder::ScoredMatchFinder), with
//! the pluggable [SingleHash](search::SingleHash)/
//! [DualHash](search::DualHash)/[HashChain](search::HashChain) finders in
//! between, whose parsing strategy ([GreedyParser](parse::GreedyParser)
//! or [OverlapParser](parse::OverlapParser)) is chosen separately.
//! [level::match_finder] maps a 0–9 quality knob onto concrete
//! configurations.
//!
//! # Usage
//!
//! ```
//! use lzpack::{TextEncoder, compress, level};
//!
//! let mut finder = level::match_finder(5);
//! let mut encoder = TextEncoder;
//! let out = compress(
//!     &mut finder,
//!     &mut encoder,
//!     b"HelloHelloHelloHelloHello, world",
//!     1 << 16,
//! )
//! .unwrap();
//! assert_eq!(out, b"Hello<20,5>, world");
//! ```

#![warn(clippy::pedantic, clippy::cargo)]
// Positions are usize internally and u32 on the wire; the conversions are
// bounded by the window size.
#![allow(clippy::cast_possible_truncation)]
// The inlined fast-path finders mirror hot loops that do not split well.
#![allow(clippy::too_many_lines)]
// LZ77 is a compression scheme, not an item to link.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

mod error;
pub mod extend;
pub mod finder;
mod hash;
pub mod hasher;
pub mod level;
mod matches;
pub mod parse;
pub mod score;
pub mod search;
mod text;
mod window;
mod writer;

pub use crate::error::{Error, Result};
pub use crate::matches::{AbsoluteMatch, AutoReset, Encoder, Match, MatchFinder};
pub use crate::text::TextEncoder;
pub use crate::writer::Writer;

/// One-shot convenience: drives `src` through a [Writer] in
/// `block_size`-byte blocks and returns the encoded stream.
///
/// # Errors
/// - [`Error::BlockTooLarge`]: `block_size` exceeds the match finder's
///   per-block limit
#[inline]
pub fn compress<F: MatchFinder, E: Encoder>(
    match_finder: &mut F,
    encoder: &mut E,
    src: &[u8],
    block_size: usize,
) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new(), match_finder, encoder, block_size);
    writer.write(src)?;
    writer.close()?;
    Ok(writer.into_inner())
}
