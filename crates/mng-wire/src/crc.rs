//! CRC-32 as used by the PNG family (ISO 3309, reflected polynomial
//! `0xEDB8_8320`).
//!
//! The lookup table is computed at compile time. A chunk's CRC covers
//! the 4 tag bytes followed by the payload, never the length field.

use crate::tag::ChunkTag;

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
    let mut table = [0_u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            if (c & 1) != 0 {
                c = 0xEDB8_8320 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

#[inline]
fn update_crc(mut crc: u32, bytes: &[u8]) -> u32 {
    for &byte in bytes {
        let i = (crc ^ u32::from(byte)) as u8 as usize;
        crc = CRC_TABLE[i] ^ (crc >> 8);
    }
    crc
}

/// Incremental CRC-32 state.
///
/// Feed it the tag and then the payload in as many pieces as are
/// convenient; the result does not depend on how the input is split.
#[derive(Clone, Copy, Debug)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    #[must_use]
    pub const fn new() -> Self {
        Self { state: u32::MAX }
    }

    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        self.state = update_crc(self.state, bytes);
        self
    }

    #[must_use]
    pub const fn finish(&self) -> u32 {
        self.state ^ u32::MAX
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-32 of a complete byte slice.
#[must_use]
pub fn crc32(bytes: &[u8]) -> u32 {
    update_crc(u32::MAX, bytes) ^ u32::MAX
}

/// CRC-32 of a chunk: tag bytes followed by payload.
#[must_use]
pub fn chunk_crc(tag: ChunkTag, payload: &[u8]) -> u32 {
    Crc32::new().update(tag.as_bytes()).update(payload).finish()
}
