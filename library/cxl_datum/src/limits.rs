//! Size limits and chunk sizes.

use crate::value::Value;

/// Longest string, in bytes, stored inline in a [`Value`] without allocating.
pub const MINI_STR_CAP: usize = 15;

/// Capacity of an array's first allocation.
pub const ARRAY_CHUNK_SIZE: usize = 8;

/// Largest number of elements an array may hold.
pub const ARRAY_SIZE_MAX: usize = isize::MAX.unsigned_abs() / std::mem::size_of::<Value>();

/// Builder work buffer size for small initial requests.
pub const CHUNK_SIZE_0: usize = 64;

/// Builder work buffer size above which growth quadruples instead of doubling.
pub const CHUNK_SIZE_4: usize = 512;

/// Largest builder work buffer; a full buffer of this size is committed as a chunk.
pub const CHUNK_SIZE_MAX: usize = 32768;
