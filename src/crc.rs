//! CRC-16/CCITT, the variant used by the radio's factory programming tool.
//!
//! Polynomial `0x1021`, initial value `0x0000` (not the more common
//! `0xFFFF`), no input or output reflection, no final XOR. This differs
//! from the `crc` crate's built-in `CRC_16_IBM_3740`/`CRC_16_CCITT_FALSE`
//! presets only in the initial value, so we spell the algorithm out
//! explicitly rather than leaning on a named preset.

use crc::{Algorithm, Crc};

const RADIO_CRC16: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0x0000,
    refin: false,
    refout: false,
    xorout: 0x0000,
    check: 0x31c3,
    residue: 0x0000,
};

/// Compute the CRC-16 used to validate a frame's (CMD, SEQ, LEN, PAYLOAD)
/// byte range.
pub fn crc16(data: &[u8]) -> u16 {
    let crc = Crc::<u16>::new(&RADIO_CRC16);
    crc.checksum(data)
}
