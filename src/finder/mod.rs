////////////////////////////////////////////////////////////////////////////////
// This Source Code Form is subject to the terms of the Mozilla Public         /
// License, v. 2.0. If a copy of the MPL was not distributed with this         /
// file, You can obtain one at https://mozilla.org/MPL/2.0/.                   /
//                                                                             /
////////////////////////////////////////////////////////////////////////////////

//! Specialized match finders with the index and parsing strategy inlined
//! for throughput, rather than composed through the [Searcher] and
//! [Parser] traits.
//!
//! [Searcher]: crate::parse::Searcher
//! [Parser]: crate::parse::Parser

mod block;
mod lazy;
mod lookahead;
mod quick;
mod scored;

pub use block::{M0, M1};
pub use lazy::LazyMatchFinder;
pub use lookahead::{DualHashLookahead, SingleHashLookahead};
pub use quick::QuickMatchFinder;
pub use scored::ScoredMatchFinder;
