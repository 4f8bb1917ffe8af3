use byteorder::{ByteOrder, LittleEndian};

use crate::hash;
use crate::hasher::Hasher;

const H2_TABLE_BITS: u32 = 16;
const H2_HASH_LEN: u32 = 5;

/// `H2` is a single-slot hasher over a 5-byte hash, in the style of the
/// fastest hash-based brotli levels.
#[derive(Default)]
pub struct H2 {
    table: Vec<u32>,
}

impl H2 {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn hash(data: &[u8]) -> usize {
        let h = (LittleEndian::read_u64(data) << (64 - 8 * H2_HASH_LEN)).wrapping_mul(hash::MUL64);
        (h >> (64 - H2_TABLE_BITS)) as usize
    }
}

impl Hasher for H2 {
    fn init(&mut self) {
        let table_len = 1 << H2_TABLE_BITS;
        if self.table.len() < table_len {
            self.table = vec![0; table_len];
        } else {
            self.table.fill(0);
        }
    }

    fn store(&mut self, data: &[u8], index: usize) {
        let h = Self::hash(&data[index..]);
        self.table[h] = index as u32;
    }

    fn candidates(&mut self, dst: &mut Vec<usize>, data: &[u8], index: usize) {
        let h = Self::hash(&data[index..]);
        let c = self.table[h];
        if c != 0 {
            dst.push(c as usize);
        }

        self.table[h] = index as u32;
    }
}
