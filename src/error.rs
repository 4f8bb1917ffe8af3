////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

use onlyerror::Error;

/// Possible errors returned by the block-driving compression entry points.
///
/// The match finders themselves are infallible on well-formed input; the
/// variants here surface caller mistakes before any window state is touched.
#[derive(Error, Debug)]
pub enum Error {
    /// Error indicating that a block was fed to a match finder with a hard
    /// per-block limit (for example the 64 KiB cap of the no-history
    /// finders). First field is the block length, second is the limit.
    #[error("block of `{0}` bytes exceeds the match finder's limit of `{1}`")]
    BlockTooLarge(usize, usize),
    /// Generic IO Error wrapper for when a generic IO error of some sort
    /// occurs while flushing encoded output to the destination writer.
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wrapper for Result specified to [Error](crate::Error)
pub type Result<T> = std::result::Result<T, Error>;
