//! Fixed-lookahead match finders: instead of committing to a match as
//! soon as it is found, they keep a short ring of the most recent
//! candidate matches and emit them only once the cursor has moved past
//! them, truncating overlaps along the way. Described in
//! <https://fastcompression.blogspot.com/2011/12/advanced-parsing-strategies.html>.

use byteorder::{ByteOrder, LittleEndian};

use crate::extend::{extend, extend_backward};
use crate::hash;
use crate::window::{Window, rebase_positions};
use crate::{AbsoluteMatch, Match, MatchFinder};

const LOOKAHEAD_BITS: usize = 17;
const LOOKAHEAD_SIZE: usize = 1 << LOOKAHEAD_BITS;
// The mask is redundant, but helps the compiler eliminate bounds checks.
const LOOKAHEAD_MASK: usize = LOOKAHEAD_SIZE - 1;

fn emit(dst: &mut Vec<Match>, m: AbsoluteMatch, next_emit: &mut usize) {
    dst.push(Match::new(
        m.start - *next_emit,
        m.end - m.start,
        m.start - m.match_pos,
    ));
    *next_emit = m.end;
}

/// Emits the matches that the cursor has moved past: the older one first
/// (truncated against its successor and dropped if it falls below
/// `min_length`), then the newest.
fn flush_matured(
    dst: &mut Vec<Match>,
    matches: &mut [AbsoluteMatch; 3],
    next_emit: &mut usize,
    min_length: usize,
) {
    if matches[1] != AbsoluteMatch::default() {
        if matches[1].end > matches[0].start {
            matches[1].end = matches[0].start;
        }
        if matches[1].len() >= min_length {
            emit(dst, matches[1], next_emit);
        }
    }
    emit(dst, matches[0], next_emit);
    *matches = [AbsoluteMatch::default(); 3];
}

/// Takes a freshly found match into the ring and classifies the three
/// live matches, emitting and discarding as needed.
fn take_match(
    dst: &mut Vec<Match>,
    matches: &mut [AbsoluteMatch; 3],
    current: AbsoluteMatch,
    next_emit: &mut usize,
    min_length: usize,
) {
    *matches = [current, matches[0], matches[1]];

    if matches[2] == AbsoluteMatch::default() {
        return;
    }

    // We have three matches, so it's time to emit one and/or eliminate one.
    if matches[0].start < matches[2].end {
        // The first and third matches overlap; discard the one in between.
        *matches = [matches[0], matches[2], AbsoluteMatch::default()];
    } else if matches[0].start < matches[2].end + min_length {
        // The first and third matches don't overlap, but there's no room
        // for another match between them. Emit the oldest match and
        // discard the middle one.
        emit(dst, matches[2], next_emit);
        *matches = [matches[0], AbsoluteMatch::default(), AbsoluteMatch::default()];
    } else {
        // Emit the oldest match, shortening it if necessary to avoid
        // overlap with the middle one.
        if matches[2].end > matches[1].start {
            matches[2].end = matches[1].start;
        }
        if matches[2].len() >= min_length {
            emit(dst, matches[2], next_emit);
        }
        matches[2] = AbsoluteMatch::default();
    }
}

/// Emits whatever is still live in the ring at the end of a block.
fn flush_remaining(
    dst: &mut Vec<Match>,
    matches: &mut [AbsoluteMatch; 3],
    next_emit: &mut usize,
    min_length: usize,
) {
    if matches[1] != AbsoluteMatch::default() {
        if matches[1].end > matches[0].start {
            matches[1].end = matches[0].start;
        }
        if matches[1].len() >= min_length {
            emit(dst, matches[1], next_emit);
        }
    }
    if matches[0] != AbsoluteMatch::default() {
        emit(dst, matches[0], next_emit);
    }
    *matches = [AbsoluteMatch::default(); 3];
}

/// `SingleHashLookahead` is a fixed-lookahead match finder over a single
/// hash table with a configurable hash width.
pub struct SingleHashLookahead {
    /// The length of the shortest match to emit.
    pub min_length: usize,

    max_distance: usize,
    hash_len: u32,
    table: Box<[u32; LOOKAHEAD_SIZE]>,
    window: Window,
}

impl SingleHashLookahead {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_distance(65535)
    }

    #[must_use]
    pub fn with_max_distance(max_distance: usize) -> Self {
        Self {
            min_length: 4,
            max_distance,
            hash_len: 6,
            table: vec![0; LOOKAHEAD_SIZE]
                .into_boxed_slice()
                .try_into()
                .unwrap(),
            window: Window::new(max_distance, max_distance * 2),
        }
    }

    /// Sets the number of bytes hashed per position, between 1 and 8.
    #[must_use]
    pub fn hash_len(mut self, hash_len: u32) -> Self {
        assert!((1..=8).contains(&hash_len));
        self.hash_len = hash_len;
        self
    }
}

impl Default for SingleHashLookahead {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder for SingleHashLookahead {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        let (start, delta) = self.window.append(src);
        if delta > 0 {
            rebase_positions(&mut self.table[..], delta);
        }

        let src = self.window.bytes();
        let hash_mask = u64::MAX >> (64 - 8 * self.hash_len);
        let mut next_emit = start;

        // The matches found but not yet emitted, newest first.
        let mut matches = [AbsoluteMatch::default(); 3];

        for i in start..src.len().saturating_sub(7) {
            if matches[0] != AbsoluteMatch::default() && i >= matches[0].end {
                // We're far enough along that we probably won't find
                // overlapping matches, so emit what we have.
                flush_matured(dst, &mut matches, &mut next_emit, self.min_length);
            }

            // Now look for a match.
            let h = ((LittleEndian::read_u64(&src[i..]) & hash_mask).wrapping_mul(hash::MUL64)
                >> (64 - LOOKAHEAD_BITS as u32)) as usize;
            let candidate = self.table[h & LOOKAHEAD_MASK] as usize;
            self.table[h & LOOKAHEAD_MASK] = i as u32;

            if candidate == 0
                || i - candidate > self.max_distance
                || i - candidate == matches[0].start - matches[0].match_pos
            {
                continue;
            }
            if LittleEndian::read_u32(&src[candidate..]) != LittleEndian::read_u32(&src[i..]) {
                continue;
            }

            // We have a 4-byte match now.
            let end = extend(src, candidate + 4, i + 4);
            let (m_start, m_match) = extend_backward(src, i, candidate, next_emit);
            if end - m_start <= matches[0].len() {
                continue;
            }

            take_match(
                dst,
                &mut matches,
                AbsoluteMatch {
                    start: m_start,
                    end,
                    match_pos: m_match,
                },
                &mut next_emit,
                self.min_length,
            );
        }

        // We've found all the matches now; emit the remaining ones.
        flush_remaining(dst, &mut matches, &mut next_emit, self.min_length);

        if next_emit < src.len() {
            dst.push(Match::literal(src.len() - next_emit));
        }
    }

    fn reset(&mut self) {
        self.table.fill(0);
        self.window.reset();
    }
}

/// `DualHashLookahead` is a fixed-lookahead match finder probing two hash
/// tables per position, keyed by 5-byte and 8-byte hashes.
pub struct DualHashLookahead {
    /// The length of the shortest match to emit.
    pub min_length: usize,

    max_distance: usize,
    table5: Box<[u32; LOOKAHEAD_SIZE]>,
    table8: Box<[u32; LOOKAHEAD_SIZE]>,
    window: Window,
}

impl DualHashLookahead {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_distance(65535)
    }

    #[must_use]
    pub fn with_max_distance(max_distance: usize) -> Self {
        Self {
            min_length: 4,
            max_distance,
            table5: vec![0; LOOKAHEAD_SIZE]
                .into_boxed_slice()
                .try_into()
                .unwrap(),
            table8: vec![0; LOOKAHEAD_SIZE]
                .into_boxed_slice()
                .try_into()
                .unwrap(),
            window: Window::new(max_distance, max_distance * 2),
        }
    }
}

impl Default for DualHashLookahead {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder for DualHashLookahead {
    fn find_matches(&mut self, dst: &mut Vec<Match>, src: &[u8]) {
        let (start, delta) = self.window.append(src);
        if delta > 0 {
            rebase_positions(&mut self.table5[..], delta);
            rebase_positions(&mut self.table8[..], delta);
        }

        let src = self.window.bytes();
        let mut next_emit = start;
        let mut matches = [AbsoluteMatch::default(); 3];

        for i in start..src.len().saturating_sub(7) {
            if matches[0] != AbsoluteMatch::default() && i >= matches[0].end {
                flush_matured(dst, &mut matches, &mut next_emit, self.min_length);
            }

            // Now look for a match, probing with a 5-byte and then an
            // 8-byte hash of the same chunk.
            let mut current = AbsoluteMatch::default();
            let chunk = LittleEndian::read_u64(&src[i..]);

            let h = ((chunk & ((1_u64 << 40) - 1)).wrapping_mul(hash::MUL64)
                >> (64 - LOOKAHEAD_BITS as u32)) as usize;
            let candidate = self.table5[h & LOOKAHEAD_MASK] as usize;
            self.table5[h & LOOKAHEAD_MASK] = i as u32;

            if candidate != 0
                && i - candidate <= self.max_distance
                && i - candidate != matches[0].start - matches[0].match_pos
                && LittleEndian::read_u32(&src[candidate..]) == chunk as u32
            {
                // We have a 4-byte match now.
                let end = extend(src, candidate + 4, i + 4);
                let (m_start, m_match) = extend_backward(src, i, candidate, next_emit);
                if end - m_start > matches[0].len() {
                    current = AbsoluteMatch {
                        start: m_start,
                        end,
                        match_pos: m_match,
                    };
                }
            }

            // Try again with the 8-byte hash.
            let h = (chunk.wrapping_mul(hash::MUL64) >> (64 - LOOKAHEAD_BITS as u32)) as usize;
            let candidate = self.table8[h & LOOKAHEAD_MASK] as usize;
            self.table8[h & LOOKAHEAD_MASK] = i as u32;

            if candidate != 0
                && i - candidate <= self.max_distance
                && i - candidate != matches[0].start - matches[0].match_pos
                && LittleEndian::read_u64(&src[candidate..]) == chunk
            {
                // We have an 8-byte match now.
                let end = extend(src, candidate + 4, i + 4);
                let (m_start, m_match) = extend_backward(src, i, candidate, next_emit);
                if end - m_start > matches[0].len() && end - m_start > current.len() {
                    current = AbsoluteMatch {
                        start: m_start,
                        end,
                        match_pos: m_match,
                    };
                }
            }

            if current == AbsoluteMatch::default() {
                continue;
            }

            take_match(dst, &mut matches, current, &mut next_emit, self.min_length);
        }

        flush_remaining(dst, &mut matches, &mut next_emit, self.min_length);

        if next_emit < src.len() {
            dst.push(Match::literal(src.len() - next_emit));
        }
    }

    fn reset(&mut self) {
        self.table5.fill(0);
        self.table8.fill(0);
        self.window.reset();
    }
}
