//! The multiplicative hash constants shared by the index structures.

/// 32-bit multiplier for 4-byte hashes.
pub(crate) const MUL32: u32 = 0x1E35_A7BD;

/// 64-bit multiplier for 5-byte hashes.
pub(crate) const MUL64: u64 = 0x1E35_A7BD_1E35_A7BD;

/// 64-bit multiplier for long (up to 8-byte) hashes.
pub(crate) const MUL64_LONG: u64 = 0x1FE3_5A7B_D357_9BD3;
