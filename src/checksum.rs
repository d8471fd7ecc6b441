//! CRC-32 variant used by the Broadcom bootloader for the NVRAM record.
//!
//! The table is the regular reflected CRC-32 (ISO-HDLC) table, but the result is returned without
//! the final complement. The output therefore never matches a stock CRC-32 implementation; it is
//! the bitwise inverse of it when the default seed is used.

/// Reflected form of the 0x04C11DB7 polynomial.
const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Seed used for the NVRAM record.
pub const CHECKSUM_SEED: u32 = 0xFFFF_FFFF;

const TABLE: [u32; 256] = generate_table();

const fn generate_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
}

/// Checksum `data` starting from [`CHECKSUM_SEED`].
pub fn checksum(data: &[u8]) -> u32 {
    checksum_with_seed(data, CHECKSUM_SEED)
}

/// Checksum `data` starting from `seed`. Passing the result of a previous call as `seed`
/// continues the computation, so a buffer can be fed in pieces.
pub fn checksum_with_seed(data: &[u8], seed: u32) -> u32 {
    data.iter().fold(seed, |crc, &byte| {
        (crc >> 8) ^ TABLE[((crc ^ byte as u32) & 0xFF) as usize]
    })
}
