use byteorder::{ByteOrder, LittleEndian};

use crate::hash;
use crate::hasher::Hasher;

/// A rolling-sweep hasher: each key owns `SWEEP` slots, and stores rotate
/// through them based on the position being stored (`pos >> 3 mod SWEEP`),
/// so nearby insertions don't all evict each other.
#[derive(Default)]
pub struct SweepHasher<const BITS: u32, const SWEEP: usize> {
    table: Vec<u32>,
}

const SWEEP_HASH_LEN: u32 = 5;

/// `H3` is a two-slot rolling-sweep hasher over a 5-byte hash.
pub type H3 = SweepHasher<16, 2>;

/// `H4` is a four-slot rolling-sweep hasher over a 5-byte hash with a
/// larger table.
pub type H4 = SweepHasher<17, 4>;

impl<const BITS: u32, const SWEEP: usize> SweepHasher<BITS, SWEEP> {
    #[must_use]
    pub fn new() -> Self {
        Self { table: Vec::new() }
    }

    fn hash(data: &[u8]) -> usize {
        let h =
            (LittleEndian::read_u64(data) << (64 - 8 * SWEEP_HASH_LEN)).wrapping_mul(hash::MUL64);
        (h >> (64 - BITS)) as usize
    }
}

impl<const BITS: u32, const SWEEP: usize> Hasher for SweepHasher<BITS, SWEEP> {
    fn init(&mut self) {
        // The sweep overhang keeps `hash + offset` in bounds without a
        // wrap-around check.
        let table_len = (1 << BITS) + SWEEP;
        if self.table.len() < table_len {
            self.table = vec![0; table_len];
        } else {
            self.table.fill(0);
        }
    }

    fn store(&mut self, data: &[u8], index: usize) {
        let h = Self::hash(&data[index..]);
        let offset = (index >> 3) % SWEEP;
        self.table[h + offset] = index as u32;
    }

    fn candidates(&mut self, dst: &mut Vec<usize>, data: &[u8], index: usize) {
        let h = Self::hash(&data[index..]);
        for &c in &self.table[h..h + SWEEP] {
            if c != 0 {
                dst.push(c as usize);
            }
        }

        let offset = (index >> 3) % SWEEP;
        self.table[h + offset] = index as u32;
    }
}
