//! CRC-32 (IEEE 802.3, reflected polynomial `0xEDB88320`).
//!
//! This is the checksum stored in every local file header and central
//! directory record. The lookup table is computed at compile time and is
//! private to this module.

/// Reflected form of the IEEE polynomial.
const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Byte-indexed lookup table, one entry per possible low byte.
const TABLE: [u32; 256] = make_table();

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { POLYNOMIAL ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Compute the CRC-32 of `bytes` in one call.
///
/// Empty input yields `0`.
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(bytes);
    crc.finalize()
}

/// Incremental CRC-32 state.
///
/// Feeding the input in any number of `update` calls gives the same
/// result as a single [`checksum`] over the concatenation.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    running: u32,
}

impl Crc32 {
    pub fn new() -> Self {
        Self { running: !0 }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        let mut running = self.running;
        for &byte in bytes {
            running = TABLE[((running ^ byte as u32) & 0xFF) as usize] ^ (running >> 8);
        }
        self.running = running;
    }

    pub fn finalize(self) -> u32 {
        !self.running
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}
