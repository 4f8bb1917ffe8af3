use byteorder::{ByteOrder, LittleEndian};

use crate::hash;
use crate::hasher::Hasher;

/// `H5` is an N-way bucketed hasher over a 4-byte hash, in the style of
/// the middle brotli compression levels. Each bucket is a ring of
/// `1 << block_bits` slots addressed by a per-bucket insertion counter.
pub struct H5 {
    block_bits: u32,
    bucket_bits: u32,

    block_size: usize,
    hash_shift: u32,
    block_mask: usize,

    num: Vec<u16>,
    buckets: Vec<u32>,
}

impl H5 {
    /// `block_bits` is the base-2 logarithm of the number of entries per
    /// hash bucket; `bucket_bits` is the base-2 logarithm of the number of
    /// buckets (typically 14 or 15).
    #[must_use]
    pub fn new(block_bits: u32, bucket_bits: u32) -> Self {
        Self {
            block_bits,
            bucket_bits,
            block_size: 0,
            hash_shift: 0,
            block_mask: 0,
            num: Vec::new(),
            buckets: Vec::new(),
        }
    }

    fn hash(&self, data: &[u8]) -> usize {
        let h = LittleEndian::read_u32(data).wrapping_mul(hash::MUL32);
        (h >> self.hash_shift) as usize
    }
}

impl Hasher for H5 {
    fn init(&mut self) {
        self.hash_shift = 32 - self.bucket_bits;
        self.block_size = 1 << self.block_bits;
        self.block_mask = self.block_size - 1;
        let bucket_count = 1 << self.bucket_bits;

        if self.num.len() < bucket_count {
            self.num = vec![0; bucket_count];
        } else {
            self.num.fill(0);
        }

        if self.buckets.len() < bucket_count * self.block_size {
            self.buckets = vec![0; bucket_count * self.block_size];
        } else {
            self.buckets.fill(0);
        }
    }

    fn store(&mut self, data: &[u8], index: usize) {
        let key = self.hash(&data[index..]);
        let minor = self.num[key] as usize & self.block_mask;
        self.buckets[(key << self.block_bits) + minor] = index as u32;
        self.num[key] = self.num[key].wrapping_add(1);
    }

    fn candidates(&mut self, dst: &mut Vec<usize>, data: &[u8], index: usize) {
        let key = self.hash(&data[index..]);
        let bucket = &mut self.buckets[key << self.block_bits..][..self.block_size];
        let n = self.num[key] as usize;
        let down = n.saturating_sub(self.block_size);
        // Walk from the newest entry down; parsers that stop on "good
        // enough" rely on this order.
        let mut i = n;
        while i > down {
            i -= 1;
            dst.push(bucket[i & self.block_mask] as usize);
        }

        bucket[n & self.block_mask] = index as u32;
        self.num[key] = self.num[key].wrapping_add(1);
    }
}

/// `H6` is the same bucket scheme as [H5] but hashes a configurable
/// number of bytes (up to 8) with a 64-bit multiplier, for longer-range
/// keys at the higher compression levels.
pub struct H6 {
    block_bits: u32,
    bucket_bits: u32,
    hash_len: u32,

    block_size: usize,
    hash_shift: u32,
    hash_mask: u64,
    block_mask: usize,

    num: Vec<u16>,
    buckets: Vec<u32>,
}

impl H6 {
    /// `hash_len` is the number of bytes to hash, at most 8 and normally 5.
    #[must_use]
    pub fn new(block_bits: u32, bucket_bits: u32, hash_len: u32) -> Self {
        Self {
            block_bits,
            bucket_bits,
            hash_len,
            block_size: 0,
            hash_shift: 0,
            hash_mask: 0,
            block_mask: 0,
            num: Vec::new(),
            buckets: Vec::new(),
        }
    }

    fn hash(&self, data: &[u8]) -> usize {
        let h = (LittleEndian::read_u64(data) & self.hash_mask).wrapping_mul(hash::MUL64_LONG);
        (h >> self.hash_shift) as usize
    }
}

impl Hasher for H6 {
    fn init(&mut self) {
        self.hash_shift = 64 - self.bucket_bits;
        self.hash_mask = u64::MAX >> (64 - 8 * self.hash_len);
        self.block_size = 1 << self.block_bits;
        self.block_mask = self.block_size - 1;
        let bucket_count = 1 << self.bucket_bits;

        if self.num.len() < bucket_count {
            self.num = vec![0; bucket_count];
        } else {
            self.num.fill(0);
        }

        if self.buckets.len() < bucket_count * self.block_size {
            self.buckets = vec![0; bucket_count * self.block_size];
        } else {
            self.buckets.fill(0);
        }
    }

    fn store(&mut self, data: &[u8], index: usize) {
        let key = self.hash(&data[index..]);
        let minor = self.num[key] as usize & self.block_mask;
        self.buckets[(key << self.block_bits) + minor] = index as u32;
        self.num[key] = self.num[key].wrapping_add(1);
    }

    fn candidates(&mut self, dst: &mut Vec<usize>, data: &[u8], index: usize) {
        let key = self.hash(&data[index..]);
        let bucket = &mut self.buckets[key << self.block_bits..][..self.block_size];
        let n = self.num[key] as usize;
        let down = n.saturating_sub(self.block_size);
        let mut i = n;
        while i > down {
            i -= 1;
            dst.push(bucket[i & self.block_mask] as usize);
        }

        bucket[n & self.block_mask] = index as u32;
        self.num[key] = self.num[key].wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_come_back_newest_first() {
        let data = [0xAB_u8; 64];
        let mut h = H5::new(2, 14);
        h.init();
        // All positions share the hash because the data is constant.
        for i in 1..=3 {
            h.store(&data, i);
        }

        let mut dst = vec![];
        h.candidates(&mut dst, &data, 9);
        assert_eq!(dst, vec![3, 2, 1]);
    }

    #[test]
    fn ring_keeps_only_the_newest_block_size_entries() {
        let data = [0xCD_u8; 64];
        let mut h = H5::new(1, 14);
        h.init();
        for i in 1..=5 {
            h.store(&data, i);
        }

        let mut dst = vec![];
        h.candidates(&mut dst, &data, 9);
        assert_eq!(dst, vec![5, 4]);
    }

    #[test]
    fn h6_masks_the_hash_to_the_configured_width() {
        let mut a = [0_u8; 16];
        let mut b = [0_u8; 16];
        a[..5].copy_from_slice(b"abcde");
        b[..5].copy_from_slice(b"abcde");
        b[5] = 0xFF;

        let mut h = H6::new(1, 14, 5);
        h.init();
        h.store(&a, 0);

        // Same 5-byte prefix hashes to the same bucket even though byte 6
        // differs.
        let mut dst = vec![];
        h.candidates(&mut dst, &b, 0);
        assert_eq!(dst, vec![0]);
    }
}
