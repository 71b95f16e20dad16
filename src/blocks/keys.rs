//! Encryption keys block (264 bytes = 8 × 33-byte entries, CMD `0x15`/`0x35`).
//! Hex-key packing resolved in SPEC_FULL.md §4.7c.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const BLOCK_LEN: usize = 264;
const SLOT_LEN: usize = 33;
const SLOT_COUNT: usize = 8;
const KEY_AREA_LEN: usize = SLOT_LEN - 1;

/// Unrecognized document strings fall back to `Arc4` (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Aes128,
    Aes256,
    #[serde(other)]
    Arc4,
}

impl Algorithm {
    fn from_nibble(path: &str, n: u8) -> Result<Self> {
        match n {
            0 => Ok(Self::Arc4),
            1 => Ok(Self::Aes128),
            2 => Ok(Self::Aes256),
            other => Err(Error::codec(path, format!("{other} is not a valid algorithm"))),
        }
    }

    fn to_nibble(self) -> u8 {
        match self {
            Self::Arc4 => 0,
            Self::Aes128 => 1,
            Self::Aes256 => 2,
        }
    }

    /// Hex-character length of a key for this algorithm.
    pub fn hex_len(self) -> usize {
        match self {
            Self::Arc4 => 10,
            Self::Aes128 => 32,
            Self::Aes256 => 64,
        }
    }

    fn byte_len(self) -> usize {
        self.hex_len() / 2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionKey {
    pub algorithm: Algorithm,
    /// Lowercase hex, exactly `algorithm.hex_len()` characters.
    pub key_hex: String,
}

pub type EncryptionKeys = Vec<Option<EncryptionKey>>;

fn encode_slot(path: &str, key: &Option<EncryptionKey>) -> Result<[u8; SLOT_LEN]> {
    let mut out = [0xFFu8; SLOT_LEN];
    let Some(key) = key else {
        return Ok(out);
    };

    if key.key_hex.len() != key.algorithm.hex_len() {
        return Err(Error::codec(
            path,
            format!(
                "key length {} does not match algorithm's required {} hex chars",
                key.key_hex.len(),
                key.algorithm.hex_len()
            ),
        ));
    }

    out[0] = key.algorithm.to_nibble();
    let mut key_area = [0u8; KEY_AREA_LEN];
    for (i, pair) in key.key_hex.as_bytes().chunks(2).enumerate() {
        let pair_str = std::str::from_utf8(pair)
            .map_err(|_| Error::codec(path, "key hex must be ASCII"))?;
        key_area[i] = u8::from_str_radix(pair_str, 16)
            .map_err(|_| Error::codec(path, format!("{pair_str:?} is not valid hex")))?;
    }
    out[1..SLOT_LEN].copy_from_slice(&key_area);
    Ok(out)
}

fn decode_slot(path: &str, bytes: &[u8]) -> Result<Option<EncryptionKey>> {
    if bytes[0] == 0xFF && bytes[1] == 0xFF {
        return Ok(None);
    }
    let algorithm = Algorithm::from_nibble(path, bytes[0] & 0x0F)?;
    let key_bytes = &bytes[1..1 + algorithm.byte_len()];
    let key_hex = key_bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(Some(EncryptionKey { algorithm, key_hex }))
}

pub fn encode(path: &str, keys: &EncryptionKeys) -> Result<Vec<u8>> {
    if keys.len() != SLOT_COUNT {
        return Err(Error::codec(path, format!("must have exactly {SLOT_COUNT} key slots")));
    }
    let mut out = Vec::with_capacity(BLOCK_LEN);
    for key in keys {
        out.extend_from_slice(&encode_slot(path, key)?);
    }
    Ok(out)
}

pub fn decode(path: &str, bytes: &[u8]) -> Result<EncryptionKeys> {
    if bytes.len() != BLOCK_LEN {
        return Err(Error::codec(
            path,
            format!("keys block must be {BLOCK_LEN} bytes, got {}", bytes.len()),
        ));
    }
    bytes
        .chunks(SLOT_LEN)
        .map(|slot| decode_slot(path, slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EncryptionKeys {
        let mut v: EncryptionKeys = vec![None; SLOT_COUNT];
        v[0] = Some(EncryptionKey {
            algorithm: Algorithm::Arc4,
            key_hex: "0123456789".into(),
        });
        v[1] = Some(EncryptionKey {
            algorithm: Algorithm::Aes128,
            key_hex: "00112233445566778899aabbccddeeff".chars().take(32).collect(),
        });
        v[2] = Some(EncryptionKey {
            algorithm: Algorithm::Aes256,
            key_hex: "00112233445566778899aabbccddeeff00112233445566778899aabbccddee".into(),
        });
        v
    }

    #[test]
    fn round_trips_all_three_algorithms() {
        let keys = sample();
        let encoded = encode("keys", &keys).unwrap();
        assert_eq!(encoded.len(), BLOCK_LEN);
        let decoded = decode("keys", &encoded).unwrap();
        assert_eq!(decoded, keys);
    }

    #[test]
    fn aes256_fills_the_entire_key_area() {
        let keys = sample();
        let encoded = encode("keys", &keys).unwrap();
        let slot2 = &encoded[2 * SLOT_LEN..3 * SLOT_LEN];
        assert!(!slot2[1..].iter().any(|&b| b == 0xFF));
    }

    #[test]
    fn empty_slots_round_trip_to_none() {
        let keys: EncryptionKeys = vec![None; SLOT_COUNT];
        let encoded = encode("keys", &keys).unwrap();
        assert_eq!(encoded, vec![0xFFu8; BLOCK_LEN]);
        assert_eq!(decode("keys", &encoded).unwrap(), keys);
    }

    #[test]
    fn rejects_wrong_length_key() {
        let mut keys = sample();
        keys[0] = Some(EncryptionKey {
            algorithm: Algorithm::Aes128,
            key_hex: "00112233".into(),
        });
        assert!(encode("keys", &keys).is_err());
    }
}
