////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

use std::io::Write;

use crate::error::{Error, Result};
use crate::{Encoder, Match, MatchFinder};

/// A `Writer` composes a [MatchFinder] and an [Encoder] into a
/// block-synchronous compression stream: input is buffered into blocks,
/// each block is run through `find_matches` and then `encode`, and the
/// encoded bytes are flushed to the destination.
pub struct Writer<W: Write, F: MatchFinder, E: Encoder> {
    dest: W,
    match_finder: F,
    encoder: E,
    block_size: usize,

    pending: Vec<u8>,
    matches: Vec<Match>,
    encoded: Vec<u8>,
    wrote_header: bool,
    closed: bool,
}

impl<W: Write, F: MatchFinder, E: Encoder> Writer<W, F, E> {
    /// # Panics
    /// Panics if `block_size` is 0.
    pub fn new(dest: W, match_finder: F, encoder: E, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be nonzero");
        Self {
            dest,
            match_finder,
            encoder,
            block_size,
            pending: Vec::new(),
            matches: Vec::new(),
            encoded: Vec::new(),
            wrote_header: false,
            closed: false,
        }
    }

    /// Appends `data` to the stream, compressing and flushing every full
    /// block.
    ///
    /// # Errors
    /// - [`Error::BlockTooLarge`]: the configured block size exceeds the
    ///   match finder's per-block limit
    /// - [`Error::Io`]: writing to the destination failed
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if let Some(max) = self.match_finder.max_block_size() {
            if self.block_size > max {
                return Err(Error::BlockTooLarge(self.block_size, max));
            }
        }

        self.pending.extend_from_slice(data);
        while self.pending.len() >= self.block_size {
            let block: Vec<u8> = self.pending.drain(..self.block_size).collect();
            self.write_block(&block, false)?;
        }
        Ok(())
    }

    /// Compresses whatever input is still buffered as the final block and
    /// flushes it. Further writes start a new stream only after
    /// [`reset`](Self::reset).
    ///
    /// # Errors
    /// - [`Error::Io`]: writing to the destination failed
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let block = std::mem::take(&mut self.pending);
        self.write_block(&block, true)?;
        self.dest.flush()?;
        self.closed = true;
        Ok(())
    }

    /// Clears all internal state and redirects the stream to `dest`.
    pub fn reset(&mut self, dest: W) {
        self.dest = dest;
        self.match_finder.reset();
        self.encoder.reset();
        self.pending.clear();
        self.matches.clear();
        self.encoded.clear();
        self.wrote_header = false;
        self.closed = false;
    }

    /// Consumes the writer, returning the destination.
    pub fn into_inner(self) -> W {
        self.dest
    }

    fn write_block(&mut self, block: &[u8], last: bool) -> Result<()> {
        self.encoded.clear();
        if !self.wrote_header {
            self.encoder.header(&mut self.encoded);
            self.wrote_header = true;
        }

        self.matches.clear();
        self.match_finder.find_matches(&mut self.matches, block);
        self.encoder
            .encode(&mut self.encoded, block, &self.matches, last);
        self.dest.write_all(&self.encoded)?;
        Ok(())
    }
}
